//! 文档注释中的错误消息标注
//!
//! 识别两种行级标签：
//!
//! ```text
//! /// @errZH 用户不存在
//! /// @errEN user not found
//! ```
//!
//! 标签后一个空格之后的整行内容原样作为消息模板，
//! 模板里可以包含运行时再填充的 `%s` 等占位符。

/// 中文消息标签
pub const ZH_TAG: &str = "@errZH ";

/// 英文消息标签
pub const EN_TAG: &str = "@errEN ";

/// 从文档文本中解析 `(中文模板, 英文模板)`
///
/// 缺失的标签得到空字符串；同一标签出现多次时以最后一次为准。
pub fn parse_message(doc: &str) -> (String, String) {
    let mut zh = String::new();
    let mut en = String::new();

    for line in doc.trim().lines() {
        if let Some(rest) = line.strip_prefix(ZH_TAG) {
            zh = rest.to_string();
        }
        if let Some(rest) = line.strip_prefix(EN_TAG) {
            en = rest.to_string();
        }
    }

    (zh, en)
}

#[cfg(test)]
mod tests;
