//! Generate pipeline integration tests
//!
//! 在临时 crate 中跑完整的 load → scan → emit 流程。

use statuserr::{describe, generate, resolve_config, GenError, GenerateConfig, StatusErr};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ERRORS_RS: &str = r#"
pub struct UserError(pub i32);

/// @errZH 用户 %s 不存在
/// @errEN user %s not found
pub const USER_NOT_FOUND: UserError = UserError(404001);

/// @errZH 参数错误
/// @errEN bad request
pub const BAD_REQUEST: UserError = UserError(400001);

pub const UNDOCUMENTED: UserError = UserError(500001);
"#;

fn write_crate(
    dir: &Path,
    manifest: &str,
) {
    fs::create_dir_all(dir.join("src/errors")).unwrap();
    fs::write(dir.join("Cargo.toml"), manifest).unwrap();
    fs::write(dir.join("src/lib.rs"), "pub mod errors;\n").unwrap();
    fs::write(dir.join("src/errors/mod.rs"), ERRORS_RS).unwrap();
}

fn user_service() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_crate(
        tmp.path(),
        "[package]\nname = \"user-service\"\nversion = \"0.1.0\"\n",
    );
    tmp
}

/// 从生成代码里取出 `StatusErr::new(...)` 的实参
fn constructor_args(
    content: &str,
    fn_name: &str,
) -> StatusErr {
    let file = syn::parse_file(content).unwrap();
    for item in file.items {
        let syn::Item::Impl(imp) = item else { continue };
        for item in imp.items {
            let syn::ImplItem::Fn(f) = item else { continue };
            if f.sig.ident != fn_name {
                continue;
            }
            let Some(syn::Stmt::Expr(syn::Expr::Call(call), None)) = f.block.stmts.last() else {
                panic!("unexpected body in {}", fn_name);
            };
            let args: Vec<&syn::Expr> = call.args.iter().collect();
            let lit_str = |e: &syn::Expr| match e {
                syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(s), .. }) => s.value(),
                other => panic!("expected string literal, got {:?}", other),
            };
            let code = match args[1] {
                syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Int(i), .. }) => i.base10_parse::<i64>().unwrap(),
                other => panic!("expected int literal, got {:?}", other),
            };
            return StatusErr::new(
                lit_str(args[0]),
                code,
                lit_str(args[2]),
                lit_str(args[3]),
            );
        }
    }
    panic!("constructor {} not generated", fn_name);
}

#[test]
fn test_generate_writes_next_to_declaration() {
    let tmp = user_service();
    let root = tmp.path().join("src");

    let written = generate(&root, &["UserError"], GenerateConfig::default()).unwrap();
    let expected = root.join("errors/user_error__generated.rs");
    assert_eq!(written, vec![expected.clone()]);

    let content = fs::read_to_string(&expected).unwrap();
    assert!(content.starts_with("// Code generated by statuserr. DO NOT EDIT.\n"));
    assert!(content.contains("// package: user_service::errors\n"));
    assert!(content.contains("pub const STATUS_ERR_CODES: &[i64] = &[400001, 404001, 500001];"));
    assert!(content.contains("/// [500001] UNDOCUMENTED\n"));
    assert!(content.find("bad_request").unwrap() < content.find("user_not_found").unwrap());
}

#[test]
fn test_generated_constructor_behaves() {
    let tmp = user_service();
    let root = tmp.path().join("src");
    generate(&root, &["UserError"], GenerateConfig::default()).unwrap();

    let content = fs::read_to_string(root.join("errors/user_error__generated.rs")).unwrap();
    let err = constructor_args(&content, "user_not_found");

    assert_eq!(err.code(), 404001);
    assert_eq!(err.status_code(), 404);
    let err = err.localize("en").with_args(&[&"alice"]);
    assert!(err.to_string().contains("user alice not found"));

    let undocumented = constructor_args(&content, "undocumented");
    assert_eq!(undocumented.message(), "");
    assert_eq!(undocumented.to_string(), "[UNDOCUMENTED][500001] ");
}

#[test]
fn test_regenerate_is_byte_stable() {
    let tmp = user_service();
    let root = tmp.path().join("src");

    generate(&root, &["UserError"], GenerateConfig::default()).unwrap();
    let path = root.join("errors/user_error__generated.rs");
    let first = fs::read(&path).unwrap();

    // 第二次运行时生成文件本身不参与扫描
    let stale = statuserr::check(&root, &["UserError"], GenerateConfig::default()).unwrap();
    assert!(stale.is_empty());
    generate(&root, &["UserError"], GenerateConfig::default()).unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn test_check_reports_stale_file() {
    let tmp = user_service();
    let root = tmp.path().join("src");

    let stale = statuserr::check(&root, &["UserError"], GenerateConfig::default()).unwrap();
    assert_eq!(stale, vec![root.join("errors/user_error__generated.rs")]);
    assert!(!root.join("errors/user_error__generated.rs").exists());
}

#[test]
fn test_generate_unknown_type_fails() {
    let tmp = user_service();
    let err = generate(&tmp.path().join("src"), &["OrderError"], GenerateConfig::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GenError>(),
        Some(GenError::TypeNotFound(name)) if name == "OrderError"
    ));
}

#[test]
fn test_generate_rejects_non_integer_type() {
    let tmp = TempDir::new().unwrap();
    write_crate(tmp.path(), "[package]\nname = \"flags\"\nversion = \"0.1.0\"\n");
    fs::write(
        tmp.path().join("src/flag.rs"),
        "pub struct Flag(pub bool);\n/// @errZH 开\npub const ON: Flag = Flag(true);\n",
    )
    .unwrap();

    let err = generate(&tmp.path().join("src"), &["Flag"], GenerateConfig::default()).unwrap_err();
    assert!(err.to_string().contains("must be an int or uint"));
    assert!(!tmp.path().join("src/flag__generated.rs").exists());
}

#[test]
fn test_describe_keeps_request_order() {
    let tmp = user_service();
    fs::write(
        tmp.path().join("src/order.rs"),
        "#[repr(u16)]\npub enum OrderError {\n    /// @errEN order missing\n    Missing = 404,\n    /// @errEN conflict\n    Conflict = 409,\n}\n",
    )
    .unwrap();

    let described = describe(
        &tmp.path().join("src"),
        &["OrderError", "UserError"],
        GenerateConfig::default(),
    )
    .unwrap();

    let names: Vec<&str> = described.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["OrderError", "UserError"]);
    let codes: Vec<i64> = described[0].1.iter().map(|d| d.error_code).collect();
    assert_eq!(codes, vec![404, 409]);
}

#[test]
fn test_resolve_config_overrides() {
    let tmp = user_service();
    fs::write(
        tmp.path().join("src/statuserr.toml"),
        "[generate]\nruntime = \"crate::status\"\nsuffix = \"_gen\"\n",
    )
    .unwrap();
    let root = tmp.path().join("src");

    let config = resolve_config(&root, None, None).unwrap();
    assert_eq!(config.runtime, "crate::status");
    assert_eq!(config.suffix, "_gen");

    let config = resolve_config(&root, Some("errs".to_string()), None).unwrap();
    assert_eq!(config.runtime, "errs");

    let written = generate(&root, &["UserError"], config).unwrap();
    assert_eq!(written, vec![root.join("errors/user_error_gen.rs")]);
    let content = fs::read_to_string(&written[0]).unwrap();
    assert!(content.contains("-> errs::StatusErr"));
}
