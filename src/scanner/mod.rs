//! 状态错误扫描器
//!
//! 通过 [`DeclarationProvider`] 枚举目标类型的常量，解析文档注释中的
//! `@errZH` / `@errEN` 标注，生成 [`ErrorDescriptor`] 并写入
//! [`DescriptorRegistry`]。
//!
//! # 示例
//!
//! ```ignore
//! let package = RustPackage::load("src/errors")?;
//! let ty = package.lookup("UserError")?;
//! let mut registry = DescriptorRegistry::new();
//! let descriptors = Scanner::new(&package).scan(&mut registry, &ty)?;
//! ```

pub mod registry;

pub use registry::DescriptorRegistry;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::annotation::parse_message;
use crate::error::{GenError, GenResult};

/// 目标类型：声明文件 + 类型名
///
/// 以身份而非结构区分，两个文件中同名的类型是不同的目标类型。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetType {
    /// 声明该类型的源文件
    pub unit: PathBuf,
    /// 类型名
    pub name: String,
}

impl TargetType {
    pub fn new(
        unit: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            unit: unit.into(),
            name: name.into(),
        }
    }

    /// 声明文件所在目录，生成文件写在这里
    pub fn dir(&self) -> &Path {
        self.unit.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for TargetType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.unit.display())
    }
}

/// 整数基础类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

impl IntKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "i8" => IntKind::I8,
            "i16" => IntKind::I16,
            "i32" => IntKind::I32,
            "i64" => IntKind::I64,
            "i128" => IntKind::I128,
            "isize" => IntKind::Isize,
            "u8" => IntKind::U8,
            "u16" => IntKind::U16,
            "u32" => IntKind::U32,
            "u64" => IntKind::U64,
            "u128" => IntKind::U128,
            "usize" => IntKind::Usize,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::I128 => "i128",
            IntKind::Isize => "isize",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::U128 => "u128",
            IntKind::Usize => "usize",
        }
    }

    /// 按 `as` 规则截断到该类型；`isize`/`usize` 按 64 位目标计算
    ///
    /// 结果超出 `i128` 时返回 `None`。
    pub fn wrap(
        &self,
        value: i128,
    ) -> Option<i128> {
        Some(match self {
            IntKind::I8 => value as i8 as i128,
            IntKind::I16 => value as i16 as i128,
            IntKind::I32 => value as i32 as i128,
            IntKind::I64 | IntKind::Isize => value as i64 as i128,
            IntKind::I128 => value,
            IntKind::U8 => value as u8 as i128,
            IntKind::U16 => value as u16 as i128,
            IntKind::U32 => value as u32 as i128,
            IntKind::U64 | IntKind::Usize => value as u64 as i128,
            IntKind::U128 if value >= 0 => value,
            IntKind::U128 => return None,
        })
    }
}

/// 目标类型的底层表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Underlying {
    Int(IntKind),
    /// 非整数表示，保存类型文本用于报错
    Other(String),
}

impl fmt::Display for Underlying {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Underlying::Int(kind) => f.write_str(kind.as_str()),
            Underlying::Other(text) => f.write_str(text),
        }
    }
}

/// 提供者返回的常量声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDecl {
    /// 常量名
    pub name: String,
    /// 十进制值；无法求值时为原始表达式文本
    pub literal: String,
    /// 原始文档注释文本
    pub doc: String,
}

/// 声明元数据提供者
///
/// 对给定类型给出底层表示，以及类型完全相同（不是仅表示兼容）的
/// 常量列表。
pub trait DeclarationProvider {
    /// 底层表示
    fn underlying(
        &self,
        ty: &TargetType,
    ) -> GenResult<Underlying>;

    /// 类型为 `ty` 的全部常量，含文档注释
    fn constants(
        &self,
        ty: &TargetType,
    ) -> GenResult<Vec<ConstDecl>>;
}

/// 错误描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    /// 常量名
    pub key: String,
    /// 错误码
    pub error_code: i64,
    /// 中文消息模板
    pub zh_message: String,
    /// 英文消息模板
    pub en_message: String,
}

impl ErrorDescriptor {
    /// 由常量声明构造；错误码无法解析时记为 0
    pub fn from_decl(decl: &ConstDecl) -> Self {
        let error_code = match decl.literal.parse::<i64>() {
            Ok(code) => code,
            Err(e) => {
                warn!(
                    "malformed code literal for {}: `{}` ({}), using 0",
                    decl.name, decl.literal, e
                );
                0
            }
        };
        let (zh_message, en_message) = parse_message(&decl.doc);
        Self {
            key: decl.name.clone(),
            error_code,
            zh_message,
            en_message,
        }
    }

    /// 排序键
    #[inline]
    pub fn sort_key(&self) -> (i64, &str) {
        (self.error_code, &self.key)
    }

    /// 错误码前三位
    #[inline]
    pub fn status_code(&self) -> i64 {
        crate::runtime::status_code(self.error_code)
    }
}

/// 扫描器
pub struct Scanner<'p, P: DeclarationProvider + ?Sized> {
    provider: &'p P,
}

impl<'p, P: DeclarationProvider + ?Sized> Scanner<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self { provider }
    }

    /// 扫描目标类型，返回按错误码升序的描述
    ///
    /// 已缓存的类型直接返回，不会再次访问提供者。
    pub fn scan<'r>(
        &self,
        registry: &'r mut DescriptorRegistry,
        ty: &TargetType,
    ) -> GenResult<&'r [ErrorDescriptor]> {
        if !registry.contains(ty) {
            self.collect(registry, ty)?;
        } else {
            debug!("{} already scanned", ty);
        }
        Ok(registry.get(ty).unwrap_or(&[]))
    }

    fn collect(
        &self,
        registry: &mut DescriptorRegistry,
        ty: &TargetType,
    ) -> GenResult<()> {
        let underlying = self.provider.underlying(ty)?;
        if !matches!(underlying, Underlying::Int(_)) {
            return Err(GenError::InvalidTargetType {
                name: ty.name.clone(),
                underlying: underlying.to_string(),
            });
        }

        let constants = self.provider.constants(ty)?;
        debug!("{}: {} constants", ty, constants.len());

        registry.mark_scanned(ty);
        for decl in &constants {
            let descriptor = ErrorDescriptor::from_decl(decl);
            debug!("  {} = {}", descriptor.key, descriptor.error_code);
            registry.add(ty, descriptor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
