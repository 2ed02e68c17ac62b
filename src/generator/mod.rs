//! 状态错误代码生成
//!
//! 按请求顺序扫描每个目标类型，在其声明文件所在目录写出
//! `<snake_case 类型名>__generated.rs`。
//!
//! 写入总是无条件覆盖；多个类型之间不做事务处理，后面的类型失败时
//! 前面已写出的文件保留。

pub mod template;

pub use template::{render, RenderContext};

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{GenError, GenResult};
use crate::scanner::{DescriptorRegistry, ErrorDescriptor, Scanner, TargetType};
use crate::source::manifest::module_path_of;
use crate::source::RustPackage;
use crate::util::case::to_snake_case;
use crate::util::config::GenerateConfig;

/// 生成文件名：`user_error__generated.rs`
pub fn output_file_name(
    type_name: &str,
    suffix: &str,
) -> String {
    format!("{}{}.rs", to_snake_case(type_name), suffix)
}

/// 一个待写出的生成文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub type_name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    /// 无条件写出
    pub fn write(&self) -> GenResult<()> {
        fs::write(&self.path, &self.content).map_err(|source| GenError::EmitIo {
            path: self.path.clone(),
            source,
        })
    }

    /// 磁盘上的内容是否已与生成结果一致
    pub fn is_up_to_date(&self) -> bool {
        fs::read(&self.path).is_ok_and(|bytes| bytes == self.content.as_bytes())
    }
}

/// 一次生成过程
pub struct Generator<'p> {
    package: &'p RustPackage,
    config: GenerateConfig,
    registry: DescriptorRegistry,
    targets: IndexMap<String, TargetType>,
}

impl<'p> Generator<'p> {
    pub fn new(
        package: &'p RustPackage,
        config: GenerateConfig,
    ) -> Self {
        Self {
            package,
            config,
            registry: DescriptorRegistry::new(),
            targets: IndexMap::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    /// 扫描类型，遇到第一个错误即中止
    pub fn scan<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> GenResult<()> {
        let scanner = Scanner::new(self.package);
        for name in names {
            let name = name.as_ref();
            let ty = self.package.lookup(name)?;
            let count = scanner.scan(&mut self.registry, &ty)?.len();
            debug!("scanned {}: {} status errors", ty, count);
            self.targets.insert(name.to_string(), ty);
        }
        Ok(())
    }

    /// 已扫描类型的描述，按错误码升序
    pub fn descriptors(
        &self,
        name: &str,
    ) -> Option<&[ErrorDescriptor]> {
        self.targets.get(name).and_then(|ty| self.registry.get(ty))
    }

    /// 已扫描类型，按请求顺序
    pub fn targets(&self) -> impl Iterator<Item = (&str, &TargetType)> {
        self.targets.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// 渲染单个类型，不写盘
    pub fn artifact(
        &self,
        name: &str,
    ) -> GenResult<Artifact> {
        let ty = self
            .targets
            .get(name)
            .ok_or_else(|| GenError::TypeNotFound(name.to_string()))?;
        let errors = self.registry.get(ty).unwrap_or(&[]);
        let package = module_path_of(&ty.unit)?;

        let content = render(&RenderContext {
            package: &package,
            type_name: &ty.name,
            runtime: &self.config.runtime,
            errors,
        });

        Ok(Artifact {
            type_name: ty.name.clone(),
            path: ty.dir().join(output_file_name(&ty.name, &self.config.suffix)),
            content,
        })
    }

    /// 渲染全部类型，不写盘
    pub fn render_all(&self) -> GenResult<Vec<Artifact>> {
        self.targets.keys().map(|name| self.artifact(name)).collect()
    }

    /// 逐个渲染并写出，返回写出的路径
    pub fn output(&self) -> GenResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.targets.len());
        for name in self.targets.keys() {
            let artifact = self.artifact(name)?;
            artifact.write()?;
            info!("generated {}", artifact.path.display());
            written.push(artifact.path);
        }
        Ok(written)
    }
}
