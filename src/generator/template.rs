//! 生成文件模板
//!
//! 生成的文件通过 `include!` 引入声明目标类型的模块：
//!
//! ```rust,ignore
//! pub struct UserError(pub i32);
//!
//! include!("user_error__generated.rs");
//! ```

use std::collections::HashSet;
use std::fmt::Write;

use crate::scanner::ErrorDescriptor;
use crate::util::case::to_snake_case;

/// 渲染所需的全部输入
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// 目标类型所在模块路径
    pub package: &'a str,
    /// 目标类型名
    pub type_name: &'a str,
    /// 运行时 crate 路径
    pub runtime: &'a str,
    /// 已按错误码排序的描述
    pub errors: &'a [ErrorDescriptor],
}

/// 严格关键字，构造函数名与之相同时改用 raw identifier
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false", "fn", "for",
    "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static",
    "struct", "trait", "true", "try", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield",
];

/// 不能写成 raw identifier 的关键字
const RESERVED: &[&str] = &["self", "super", "crate", "Self"];

/// 渲染生成文件内容
///
/// 输出只取决于上下文，相同输入得到相同字节。
pub fn render(ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    let rt = ctx.runtime;

    // String 的 fmt::Write 不会失败
    let _ = writeln!(out, "// Code generated by statuserr. DO NOT EDIT.");
    let _ = writeln!(out, "// package: {}", ctx.package);
    let _ = writeln!(out, "// type: {}", ctx.type_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "impl {} {{", ctx.type_name);

    let codes: Vec<String> = ctx.errors.iter().map(|e| e.error_code.to_string()).collect();
    let _ = writeln!(out, "    /// Codes of all status errors, ascending.");
    let _ = writeln!(
        out,
        "    pub const STATUS_ERR_CODES: &[i64] = &[{}];",
        codes.join(", ")
    );

    let mut used = HashSet::new();
    for error in ctx.errors {
        let fn_name = constructor_name(&error.key, &mut used);
        let _ = writeln!(out);
        let _ = writeln!(out, "    /// [{}] {}", error.error_code, summary_line(error));
        let _ = writeln!(out, "    pub fn {}() -> {}::StatusErr {{", fn_name, rt);
        let _ = writeln!(
            out,
            "        {}::StatusErr::new({:?}, {}, {:?}, {:?})",
            rt, error.key, error.error_code, error.zh_message, error.en_message
        );
        let _ = writeln!(out, "    }}");
    }

    let _ = writeln!(out, "}}");
    out
}

fn summary_line(error: &ErrorDescriptor) -> &str {
    [&error.zh_message, &error.en_message]
        .into_iter()
        .find(|m| !m.is_empty())
        .map(String::as_str)
        .unwrap_or(&error.key)
}

/// 常量名转为构造函数名，冲突时追加序号
fn constructor_name(
    key: &str,
    used: &mut HashSet<String>,
) -> String {
    let mut base = to_snake_case(key);
    if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
        base = format!("err_{}", base);
    }
    if RESERVED.contains(&base.as_str()) {
        base.push('_');
    }

    let mut name = base.clone();
    let mut n = 2;
    while !used.insert(name.clone()) {
        name = format!("{}_{}", base, n);
        n += 1;
    }

    if KEYWORDS.contains(&name.as_str()) {
        format!("r#{}", name)
    } else {
        name
    }
}
