//! statuserr - Status error generator
//!
//! Scans integer-backed Rust types for constants annotated with bilingual
//! messages and generates constructors returning [`StatusErr`].
//!
//! # Example
//!
//! ```rust,ignore
//! pub struct UserError(pub i32);
//!
//! /// @errZH 用户 %s 不存在
//! /// @errEN user %s not found
//! pub const USER_NOT_FOUND: UserError = UserError(404001);
//!
//! include!("user_error__generated.rs");
//! ```
//!
//! ```no_run
//! use statuserr::{generate, resolve_config, Result};
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let root = Path::new("src");
//!     let config = resolve_config(root, None, None)?;
//!     generate(root, &["UserError"], config)?;
//!     Ok(())
//! }
//! ```

#![warn(rust_2018_idioms)]

pub mod annotation;
pub mod error;
pub mod generator;
pub mod runtime;
pub mod scanner;
pub mod source;
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use error::{GenError, GenResult};
pub use generator::{Artifact, Generator};
pub use runtime::{CommonError, Locale, StatusErr};
pub use scanner::{DeclarationProvider, DescriptorRegistry, ErrorDescriptor, Scanner, TargetType};
pub use source::RustPackage;
pub use util::config::GenerateConfig;

use std::path::{Path, PathBuf};
use tracing::debug;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name
pub const NAME: &str = "statuserr";

/// Merge `statuserr.toml` with CLI overrides
pub fn resolve_config(
    root: &Path,
    runtime: Option<String>,
    suffix: Option<String>,
) -> Result<GenerateConfig> {
    let dir = if root.is_file() {
        root.parent().unwrap_or_else(|| Path::new(""))
    } else {
        root
    };
    let mut config = util::config::load_project_config(dir)
        .map_err(GenError::from)
        .with_context(|| format!("Failed to load config in {}", dir.display()))?
        .generate;

    if let Some(runtime) = runtime {
        config.runtime = runtime;
    }
    if let Some(suffix) = suffix {
        config.suffix = suffix;
    }
    debug!("config: {:?}", config);
    Ok(config)
}

fn scan<'p, S: AsRef<str>>(
    package: &'p RustPackage,
    names: &[S],
    config: GenerateConfig,
) -> Result<Generator<'p>> {
    let mut generator = Generator::new(package, config);
    generator.scan(names)?;
    Ok(generator)
}

fn load(
    root: &Path,
    config: &GenerateConfig,
) -> Result<RustPackage> {
    RustPackage::load_excluding(root, &config.suffix)
        .with_context(|| format!("Failed to load sources: {}", root.display()))
}

/// Scan the given types under `root` and write their generated files
pub fn generate<S: AsRef<str>>(
    root: &Path,
    names: &[S],
    config: GenerateConfig,
) -> Result<Vec<PathBuf>> {
    let package = load(root, &config)?;
    let generator = scan(&package, names, config)?;
    Ok(generator.output()?)
}

/// Render without writing; returns the files whose content would change
pub fn check<S: AsRef<str>>(
    root: &Path,
    names: &[S],
    config: GenerateConfig,
) -> Result<Vec<PathBuf>> {
    let package = load(root, &config)?;
    let generator = scan(&package, names, config)?;
    Ok(generator
        .render_all()?
        .into_iter()
        .filter(|artifact| !artifact.is_up_to_date())
        .map(|artifact| artifact.path)
        .collect())
}

/// Scan the given types and return their descriptors in request order
pub fn describe<S: AsRef<str>>(
    root: &Path,
    names: &[S],
    config: GenerateConfig,
) -> Result<Vec<(String, Vec<ErrorDescriptor>)>> {
    let package = load(root, &config)?;
    let generator = scan(&package, names, config)?;
    let described = generator
        .targets()
        .map(|(name, _)| {
            let list = generator.descriptors(name).unwrap_or(&[]).to_vec();
            (name.to_string(), list)
        })
        .collect();
    Ok(described)
}
