//! Cargo.toml 定位与模块路径推导
//!
//! 生成文件头部记录目标类型所在的模块路径，例如
//! `my_service::errors::user`。

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use crate::error::{GenError, GenResult};

/// Cargo manifest 文件名
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// 只读取需要的字段
#[derive(Debug, Clone, Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
    lib: Option<CargoLib>,
}

#[derive(Debug, Clone, Deserialize)]
struct CargoPackage {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CargoLib {
    name: Option<String>,
}

/// 目标文件所属的 crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateInfo {
    /// crate 名（`-` 已替换为 `_`）
    pub name: String,
    /// Cargo.toml 所在目录
    pub dir: PathBuf,
}

impl CrateInfo {
    /// 从源文件向上查找最近的 Cargo.toml
    pub fn locate(file: &Path) -> GenResult<Self> {
        let start = file.parent().unwrap_or_else(|| Path::new(""));
        for dir in start.ancestors() {
            let manifest = dir.join(MANIFEST_FILE);
            if manifest.is_file() {
                return Self::load(dir, &manifest);
            }
        }
        Err(GenError::PackageResolution {
            path: file.to_path_buf(),
            reason: format!("no {} found in any parent directory", MANIFEST_FILE),
        })
    }

    fn load(
        dir: &Path,
        manifest: &Path,
    ) -> GenResult<Self> {
        let content = std::fs::read_to_string(manifest).map_err(|source| GenError::Io {
            path: manifest.to_path_buf(),
            source,
        })?;
        let parsed: CargoManifest = toml::from_str(&content).map_err(|e| GenError::PackageResolution {
            path: manifest.to_path_buf(),
            reason: e.to_string(),
        })?;

        let name = parsed
            .lib
            .and_then(|lib| lib.name)
            .or(parsed.package.map(|p| p.name))
            .ok_or_else(|| GenError::PackageResolution {
                path: manifest.to_path_buf(),
                reason: "manifest has no [package] section".to_string(),
            })?;

        Ok(Self {
            name: name.replace('-', "_"),
            dir: dir.to_path_buf(),
        })
    }

    /// 源文件对应的模块路径
    ///
    /// `src/lib.rs`、`src/main.rs` 与 `mod.rs` 归属其所在目录的模块。
    pub fn module_path(
        &self,
        file: &Path,
    ) -> String {
        let relative = file.strip_prefix(&self.dir).unwrap_or(file);
        let mut segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str().map(str::to_string),
                _ => None,
            })
            .collect();

        if segments.first().is_some_and(|s| s == "src") {
            segments.remove(0);
        }
        if let Some(last) = segments.pop() {
            let stem = last.strip_suffix(".rs").unwrap_or(&last);
            let is_root = matches!(stem, "mod")
                || (segments.is_empty() && matches!(stem, "lib" | "main"));
            if !is_root {
                segments.push(stem.to_string());
            }
        }

        std::iter::once(self.name.clone())
            .chain(segments)
            .collect::<Vec<_>>()
            .join("::")
    }
}

/// 源文件的完整模块路径
pub fn module_path_of(file: &Path) -> GenResult<String> {
    Ok(CrateInfo::locate(file)?.module_path(file))
}
