//! Rust 源码声明提供者
//!
//! 用 `walkdir` 遍历源码目录，`syn` 解析每个 `.rs` 文件，实现
//! [`DeclarationProvider`]。
//!
//! 目标类型必须是以下两种之一：
//!
//! ```rust,ignore
//! pub struct UserError(pub i32);
//!
//! #[repr(u32)]
//! pub enum OrderError { /* ... */ }
//! ```
//!
//! 常量的来源：
//!
//! - 同一文件中类型为目标类型（或其别名）的顶层 `const`
//! - `impl UserError { ... }` 中类型为 `Self` 的关联常量
//! - `#[repr(int)]` 枚举的各个变体，未写判别值时取前一个值加一

pub mod manifest;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use quote::ToTokens;
use syn::{Attribute, Expr, ExprLit, Fields, ImplItem, Item, ItemEnum, ItemStruct, Lit, Meta, Type, UnOp};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{GenError, GenResult};
use crate::scanner::{ConstDecl, DeclarationProvider, IntKind, TargetType, Underlying};

/// 生成文件的默认标记后缀
pub const GENERATED_SUFFIX: &str = "__generated";

/// 一组已解析的 Rust 源文件
#[derive(Debug, Default)]
pub struct RustPackage {
    units: IndexMap<PathBuf, syn::File>,
}

impl RustPackage {
    /// 递归加载目录（或单个文件），跳过已生成的文件
    pub fn load(root: impl AsRef<Path>) -> GenResult<Self> {
        Self::load_excluding(root, GENERATED_SUFFIX)
    }

    /// 同 [`RustPackage::load`]，自定义要跳过的生成文件后缀
    pub fn load_excluding(
        root: impl AsRef<Path>,
        generated_suffix: &str,
    ) -> GenResult<Self> {
        let root = root.as_ref();
        let mut package = RustPackage::default();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e));

        for entry in walker {
            let entry = entry.map_err(|e| GenError::Io {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("rs") {
                continue;
            }
            let is_generated = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.ends_with(generated_suffix));
            if is_generated {
                debug!("skip generated file {}", path.display());
                continue;
            }

            let content = fs::read_to_string(path).map_err(|source| GenError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            package.add_source(path, &content)?;
        }

        debug!("loaded {} source files from {}", package.units.len(), root.display());
        Ok(package)
    }

    /// 从内存中的源码构造
    pub fn from_sources<I, P, S>(sources: I) -> GenResult<Self>
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let mut package = RustPackage::default();
        for (path, content) in sources {
            package.add_source(path.as_ref(), content.as_ref())?;
        }
        Ok(package)
    }

    fn add_source(
        &mut self,
        path: &Path,
        content: &str,
    ) -> GenResult<()> {
        let file = syn::parse_file(content).map_err(|source| GenError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        self.units.insert(path.to_path_buf(), file);
        Ok(())
    }

    /// 已加载的文件
    pub fn units(&self) -> impl Iterator<Item = &Path> {
        self.units.keys().map(PathBuf::as_path)
    }

    /// 按名称查找唯一的类型声明
    pub fn lookup(
        &self,
        name: &str,
    ) -> GenResult<TargetType> {
        let units: Vec<&PathBuf> = self
            .units
            .iter()
            .filter(|(_, file)| find_type(file, name).is_some())
            .map(|(path, _)| path)
            .collect();

        match units.as_slice() {
            [] => Err(GenError::TypeNotFound(name.to_string())),
            [unit] => Ok(TargetType::new(*unit, name)),
            _ => Err(GenError::AmbiguousType {
                name: name.to_string(),
                units: units.into_iter().cloned().collect(),
            }),
        }
    }

    fn unit(
        &self,
        ty: &TargetType,
    ) -> GenResult<&syn::File> {
        self.units.get(&ty.unit).ok_or_else(|| GenError::PackageResolution {
            path: ty.unit.clone(),
            reason: format!("declaring file of `{}` is not part of the scanned sources", ty.name),
        })
    }
}

impl DeclarationProvider for RustPackage {
    fn underlying(
        &self,
        ty: &TargetType,
    ) -> GenResult<Underlying> {
        let file = self.unit(ty)?;
        Ok(match type_item(file, ty)? {
            TypeItem::Struct(item) => struct_underlying(item),
            TypeItem::Enum(item) => enum_underlying(item),
        })
    }

    fn constants(
        &self,
        ty: &TargetType,
    ) -> GenResult<Vec<ConstDecl>> {
        let file = self.unit(ty)?;
        let names = type_names(file, &ty.name);

        // 枚举只取变体，关联常量和顶层常量只对新类型结构体生效
        if let TypeItem::Enum(item) = type_item(file, ty)? {
            return Ok(enum_constants(item, &names));
        }

        let mut constants = Vec::new();
        for item in &file.items {
            match item {
                Item::Const(c) if is_target_type(&c.ty, &names, false) => {
                    constants.push(ConstDecl {
                        name: c.ident.to_string(),
                        literal: literal(&c.expr, &names),
                        doc: doc_text(&c.attrs),
                    });
                }
                Item::Impl(imp) if imp.trait_.is_none() && is_target_type(&imp.self_ty, &names, false) => {
                    for impl_item in &imp.items {
                        let ImplItem::Const(c) = impl_item else {
                            continue;
                        };
                        if !is_target_type(&c.ty, &names, true) {
                            continue;
                        }
                        constants.push(ConstDecl {
                            name: c.ident.to_string(),
                            literal: literal(&c.expr, &names),
                            doc: doc_text(&c.attrs),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(constants)
    }
}

#[derive(Clone, Copy)]
enum TypeItem<'f> {
    Struct(&'f ItemStruct),
    Enum(&'f ItemEnum),
}

fn type_item<'f>(
    file: &'f syn::File,
    ty: &TargetType,
) -> GenResult<TypeItem<'f>> {
    find_type(file, &ty.name).ok_or_else(|| GenError::TypeNotFound(ty.name.clone()))
}

fn find_type<'f>(
    file: &'f syn::File,
    name: &str,
) -> Option<TypeItem<'f>> {
    file.items.iter().find_map(|item| match item {
        Item::Struct(s) if s.ident == name && matches!(s.fields, Fields::Unnamed(_)) => {
            Some(TypeItem::Struct(s))
        }
        Item::Enum(e) if e.ident == name => Some(TypeItem::Enum(e)),
        _ => None,
    })
}

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|n| n == "target" || n.starts_with('.'))
}

fn struct_underlying(item: &ItemStruct) -> Underlying {
    if let Fields::Unnamed(fields) = &item.fields {
        if fields.unnamed.len() == 1 {
            let ty = &fields.unnamed[0].ty;
            return primitive_int(ty).map(Underlying::Int).unwrap_or_else(|| {
                Underlying::Other(ty.to_token_stream().to_string())
            });
        }
    }
    Underlying::Other(item.fields.to_token_stream().to_string())
}

fn enum_underlying(item: &ItemEnum) -> Underlying {
    if item.variants.iter().any(|v| !matches!(v.fields, Fields::Unit)) {
        return Underlying::Other(format!("enum {} with fields", item.ident));
    }
    match repr_int(&item.attrs) {
        Some(kind) => Underlying::Int(kind),
        None => Underlying::Other(format!("enum {} without integer repr", item.ident)),
    }
}

fn primitive_int(ty: &Type) -> Option<IntKind> {
    match ty {
        Type::Path(p) if p.qself.is_none() => {
            p.path.get_ident().and_then(|id| IntKind::from_name(&id.to_string()))
        }
        Type::Group(g) => primitive_int(&g.elem),
        Type::Paren(p) => primitive_int(&p.elem),
        _ => None,
    }
}

fn repr_int(attrs: &[Attribute]) -> Option<IntKind> {
    let mut kind = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("repr")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if let Some(found) = meta.path.get_ident().and_then(|id| IntKind::from_name(&id.to_string())) {
                kind = Some(found);
            }
            // repr(align(8)) 之类带参数的项直接跳过
            if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        });
        if let Err(e) = parsed {
            warn!("unrecognized repr attribute: {}", e);
        }
    }
    kind
}

/// 目标类型名及同文件中指向它的别名
fn type_names(
    file: &syn::File,
    name: &str,
) -> HashSet<String> {
    let mut names = HashSet::from([name.to_string()]);
    // 别名可以链式指向，直到不再增长
    loop {
        let before = names.len();
        for item in &file.items {
            if let Item::Type(alias) = item {
                if alias.generics.params.is_empty() && is_target_type(&alias.ty, &names, false) {
                    names.insert(alias.ident.to_string());
                }
            }
        }
        if names.len() == before {
            break;
        }
    }
    names
}

/// 声明类型是否与目标类型相同
///
/// 只接受单段路径、`self::` 前缀路径，以及 impl 块中的 `Self`；
/// 其它多段路径可能指向别的模块中的同名类型，不计入。
fn is_target_type(
    ty: &Type,
    names: &HashSet<String>,
    allow_self: bool,
) -> bool {
    match ty {
        Type::Path(p) if p.qself.is_none() => {
            let segments = &p.path.segments;
            let Some(last) = segments.last() else {
                return false;
            };
            if !last.arguments.is_none() || p.path.leading_colon.is_some() {
                return false;
            }
            let prefix_ok = match segments.len() {
                1 => true,
                2 => segments[0].ident == "self",
                _ => false,
            };
            let ident = last.ident.to_string();
            prefix_ok && (names.contains(&ident) || (allow_self && segments.len() == 1 && ident == "Self"))
        }
        Type::Group(g) => is_target_type(&g.elem, names, allow_self),
        Type::Paren(p) => is_target_type(&p.elem, names, allow_self),
        _ => false,
    }
}

fn enum_constants(
    item: &ItemEnum,
    names: &HashSet<String>,
) -> Vec<ConstDecl> {
    let mut constants = Vec::with_capacity(item.variants.len());
    let mut next = Some(0i128);
    let mut prev_literal = String::new();

    for variant in &item.variants {
        let literal = match &variant.discriminant {
            Some((_, expr)) => {
                next = eval(expr, names).and_then(|v| v.checked_add(1));
                literal(expr, names)
            }
            None => match next {
                Some(value) => {
                    next = value.checked_add(1);
                    value.to_string()
                }
                None => format!("({}) + 1", prev_literal),
            },
        };
        prev_literal = literal.clone();
        constants.push(ConstDecl {
            name: variant.ident.to_string(),
            literal,
            doc: doc_text(&variant.attrs),
        });
    }

    constants
}

/// 可求值时给出十进制文本，否则给出表达式原文
fn literal(
    expr: &Expr,
    names: &HashSet<String>,
) -> String {
    match eval(expr, names) {
        Some(value) => value.to_string(),
        None => expr.to_token_stream().to_string(),
    }
}

fn eval(
    expr: &Expr,
    names: &HashSet<String>,
) -> Option<i128> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Int(int), .. }) => int.base10_parse::<i128>().ok(),
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
            eval(&unary.expr, names).and_then(i128::checked_neg)
        }
        Expr::Paren(p) => eval(&p.expr, names),
        Expr::Group(g) => eval(&g.expr, names),
        // 转换到非整数类型时不求值
        Expr::Cast(c) => {
            let kind = primitive_int(&c.ty)?;
            eval(&c.expr, names).and_then(|v| kind.wrap(v))
        }
        // UserError(404001) / Self(404001)
        Expr::Call(call) if call.args.len() == 1 => {
            let Expr::Path(func) = call.func.as_ref() else {
                return None;
            };
            let ident = func.path.get_ident()?.to_string();
            if ident == "Self" || names.contains(&ident) {
                eval(&call.args[0], names)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// 拼接 `#[doc]` 属性，每行去掉一个前导空格
fn doc_text(attrs: &[Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("doc")) {
        let Meta::NameValue(nv) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit { lit: Lit::Str(text), .. }) = &nv.value else {
            continue;
        };
        for line in text.value().lines() {
            lines.push(line.strip_prefix(' ').unwrap_or(line).to_string());
        }
    }
    lines.join("\n")
}
