//! 标注解析测试

use super::*;
use proptest::prelude::*;

#[test]
fn test_parse_both_tags() {
    let (zh, en) = parse_message("@errZH 用户不存在\n@errEN user not found");
    assert_eq!(zh, "用户不存在");
    assert_eq!(en, "user not found");
}

#[test]
fn test_parse_empty() {
    let (zh, en) = parse_message("");
    assert!(zh.is_empty());
    assert!(en.is_empty());
}

#[test]
fn test_order_independent() {
    let (zh, en) = parse_message("@errEN user %s not found\n@errZH 用户 %s 不存在");
    assert_eq!(zh, "用户 %s 不存在");
    assert_eq!(en, "user %s not found");
}

#[test]
fn test_only_one_tag() {
    let (zh, en) = parse_message("UserNotFound is returned when...\n@errEN user not found");
    assert_eq!(zh, "");
    assert_eq!(en, "user not found");
}

#[test]
fn test_unrelated_lines_ignored() {
    let doc = "用户相关错误\n\n@errZH 用户不存在\nsee also: OrderNotFound\n@errEN user not found\n";
    let (zh, en) = parse_message(doc);
    assert_eq!(zh, "用户不存在");
    assert_eq!(en, "user not found");
}

#[test]
fn test_tag_requires_space() {
    // 标签后必须有空格
    let (zh, en) = parse_message("@errZH\n@errENuser not found");
    assert!(zh.is_empty());
    assert!(en.is_empty());
}

#[test]
fn test_indented_tag_not_recognized() {
    let (zh, _) = parse_message("first line\n   @errZH 缩进");
    assert!(zh.is_empty());
}

#[test]
fn test_last_occurrence_wins() {
    let (zh, _) = parse_message("@errZH 旧消息\n@errZH 新消息");
    assert_eq!(zh, "新消息");
}

#[test]
fn test_rest_of_line_verbatim() {
    let (zh, en) = parse_message("@errZH  两个空格 %d 次\r\n@errEN tried %d times: \"%s\"");
    assert_eq!(zh, " 两个空格 %d 次");
    assert_eq!(en, "tried %d times: \"%s\"");
}

proptest! {
    #[test]
    fn prop_roundtrip_single_line_templates(
        zh in "[^\r\n]{0,24}",
        en in "[^\r\n]{0,24}",
    ) {
        // 首尾空白会被整体 trim 掉，这里只取内部无首尾空白的模板
        let zh = zh.trim().to_string();
        let en = en.trim().to_string();
        let doc = format!("{ZH_TAG}{zh}\n{EN_TAG}{en}");
        let (got_zh, got_en) = parse_message(&doc);
        prop_assert_eq!(got_zh, zh);
        prop_assert_eq!(got_en, en);
    }
}
