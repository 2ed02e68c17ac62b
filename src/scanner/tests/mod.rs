//! 扫描器测试
//!
//! 使用内存中的提供者，验证排序、缓存与容错行为。

use super::*;
use std::cell::Cell;

struct MockProvider {
    underlying: Underlying,
    constants: Vec<ConstDecl>,
    calls: Cell<usize>,
}

impl MockProvider {
    fn new(constants: Vec<ConstDecl>) -> Self {
        Self {
            underlying: Underlying::Int(IntKind::I32),
            constants,
            calls: Cell::new(0),
        }
    }
}

impl DeclarationProvider for MockProvider {
    fn underlying(
        &self,
        _ty: &TargetType,
    ) -> GenResult<Underlying> {
        Ok(self.underlying.clone())
    }

    fn constants(
        &self,
        _ty: &TargetType,
    ) -> GenResult<Vec<ConstDecl>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.constants.clone())
    }
}

fn decl(
    name: &str,
    literal: &str,
    doc: &str,
) -> ConstDecl {
    ConstDecl {
        name: name.to_string(),
        literal: literal.to_string(),
        doc: doc.to_string(),
    }
}

fn user_error() -> TargetType {
    TargetType::new("src/errors.rs", "UserError")
}

#[test]
fn test_scan_sorted_ascending() {
    let provider = MockProvider::new(vec![
        decl("Conflict", "409001", ""),
        decl("Unauthorized", "401001", ""),
        decl("UserNotFound", "404001", "@errZH 用户不存在\n@errEN user not found"),
    ]);
    let mut registry = DescriptorRegistry::new();
    let list = Scanner::new(&provider).scan(&mut registry, &user_error()).unwrap();

    let keys: Vec<&str> = list.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["Unauthorized", "UserNotFound", "Conflict"]);
    assert_eq!(list[1].zh_message, "用户不存在");
    assert_eq!(list[1].en_message, "user not found");
}

#[test]
fn test_scan_twice_uses_cache() {
    let provider = MockProvider::new(vec![decl("A", "500001", ""), decl("B", "400001", "")]);
    let mut registry = DescriptorRegistry::new();
    let scanner = Scanner::new(&provider);

    let first = scanner.scan(&mut registry, &user_error()).unwrap().to_vec();
    let second = scanner.scan(&mut registry, &user_error()).unwrap().to_vec();

    assert_eq!(first, second);
    assert_eq!(provider.calls.get(), 1);
}

#[test]
fn test_scan_caches_empty_type() {
    let provider = MockProvider::new(Vec::new());
    let mut registry = DescriptorRegistry::new();
    let scanner = Scanner::new(&provider);

    assert!(scanner.scan(&mut registry, &user_error()).unwrap().is_empty());
    assert!(scanner.scan(&mut registry, &user_error()).unwrap().is_empty());
    assert_eq!(provider.calls.get(), 1);
}

#[test]
fn test_duplicate_codes_kept() {
    let provider = MockProvider::new(vec![
        decl("UserNotFound", "404001", ""),
        decl("AccountNotFound", "404001", ""),
    ]);
    let mut registry = DescriptorRegistry::new();
    let list = Scanner::new(&provider).scan(&mut registry, &user_error()).unwrap();

    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|d| d.error_code == 404001));
}

#[test]
fn test_malformed_literal_defaults_to_zero() {
    let provider = MockProvider::new(vec![
        decl("Computed", "BASE + 1", "@errZH 计算值"),
        decl("Plain", "400001", ""),
    ]);
    let mut registry = DescriptorRegistry::new();
    let list = Scanner::new(&provider).scan(&mut registry, &user_error()).unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].key, "Computed");
    assert_eq!(list[0].error_code, 0);
    assert_eq!(list[0].zh_message, "计算值");
}

#[test]
fn test_invalid_target_type() {
    let mut provider = MockProvider::new(vec![decl("A", "1", "")]);
    provider.underlying = Underlying::Other("String".to_string());
    let mut registry = DescriptorRegistry::new();

    let result = Scanner::new(&provider).scan(&mut registry, &user_error());
    assert!(matches!(result, Err(GenError::InvalidTargetType { .. })));
    assert_eq!(provider.calls.get(), 0);
    assert!(registry.is_empty());
}

#[test]
fn test_provider_error_propagates() {
    struct Unresolvable;

    impl DeclarationProvider for Unresolvable {
        fn underlying(
            &self,
            _ty: &TargetType,
        ) -> GenResult<Underlying> {
            Ok(Underlying::Int(IntKind::U16))
        }

        fn constants(
            &self,
            ty: &TargetType,
        ) -> GenResult<Vec<ConstDecl>> {
            Err(GenError::PackageResolution {
                path: ty.unit.clone(),
                reason: "unit not loaded".to_string(),
            })
        }
    }

    let mut registry = DescriptorRegistry::new();
    let result = Scanner::new(&Unresolvable).scan(&mut registry, &user_error());
    assert!(matches!(result, Err(GenError::PackageResolution { .. })));
    assert!(!registry.contains(&user_error()));
}

#[test]
fn test_descriptor_status_code() {
    let d = ErrorDescriptor::from_decl(&decl("UserNotFound", "404001", ""));
    assert_eq!(d.status_code(), 404);
}

#[test]
fn test_int_kind_names() {
    for name in ["i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize"] {
        assert_eq!(IntKind::from_name(name).map(|k| k.as_str()), Some(name));
    }
    assert!(IntKind::from_name("f64").is_none());
    assert!(IntKind::from_name("bool").is_none());
}

#[test]
fn test_int_kind_wrap() {
    assert_eq!(IntKind::U16.wrap(70000), Some(4464));
    assert_eq!(IntKind::U8.wrap(-1), Some(255));
    assert_eq!(IntKind::I8.wrap(200), Some(-56));
    assert_eq!(IntKind::I32.wrap(404001), Some(404001));
    assert_eq!(IntKind::U128.wrap(-1), None);
}

#[test]
fn test_target_type_dir() {
    assert_eq!(user_error().dir(), Path::new("src"));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_scan_always_sorted(codes in proptest::collection::vec(0i64..1_000_000, 0..32)) {
            let constants = codes
                .iter()
                .enumerate()
                .map(|(i, code)| decl(&format!("E{i}"), &code.to_string(), ""))
                .collect();
            let provider = MockProvider::new(constants);
            let mut registry = DescriptorRegistry::new();
            let list = Scanner::new(&provider).scan(&mut registry, &user_error()).unwrap();

            prop_assert_eq!(list.len(), codes.len());
            prop_assert!(list.windows(2).all(|w| w[0].error_code <= w[1].error_code));
        }
    }
}
