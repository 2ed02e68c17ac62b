//! Generator error types

use std::path::PathBuf;
use thiserror::Error;

use crate::util::config::ConfigError;

/// Errors that abort a generation run.
///
/// 所有变体都是致命错误；非法的错误码字面量不在此列，
/// 扫描器只记录警告并以 0 代替。
#[derive(Debug, Error)]
pub enum GenError {
    /// Underlying representation of the target type is not an integer
    #[error("status error type underlying must be an int or uint, but got {name}: {underlying}")]
    InvalidTargetType { name: String, underlying: String },

    /// Declaring unit or package of a type cannot be located
    #[error("cannot resolve package for {}: {reason}", path.display())]
    PackageResolution { path: PathBuf, reason: String },

    /// No tuple struct or enum with this name in the scanned sources
    #[error("type `{0}` not found")]
    TypeNotFound(String),

    /// Same type name declared by several units
    #[error("type `{name}` is declared in more than one file: {}", display_paths(units))]
    AmbiguousType { name: String, units: Vec<PathBuf> },

    /// Source file is not valid Rust
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    /// Reading sources failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a generated artifact failed
    #[error("failed to write {}: {source}", path.display())]
    EmitIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid statuserr.toml
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for generator operations
pub type GenResult<T> = Result<T, GenError>;
