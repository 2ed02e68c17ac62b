//! 错误描述注册表
//!
//! 按目标类型缓存扫描结果。写入时按 `(错误码, 名称)` 有序插入，
//! 读取直接返回已排序的切片，生成结果与扫描顺序无关。

use indexmap::IndexMap;

use super::{ErrorDescriptor, TargetType};

/// 一次生成过程内的描述缓存
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    entries: IndexMap<TargetType, Vec<ErrorDescriptor>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加描述，不按错误码或名称去重
    pub fn add(
        &mut self,
        ty: &TargetType,
        descriptor: ErrorDescriptor,
    ) {
        let list = self.entries.entry(ty.clone()).or_default();
        let at = list.partition_point(|d| d.sort_key() <= descriptor.sort_key());
        list.insert(at, descriptor);
    }

    /// 标记类型已扫描（即使没有任何常量）
    pub fn mark_scanned(
        &mut self,
        ty: &TargetType,
    ) {
        self.entries.entry(ty.clone()).or_default();
    }

    /// 按错误码升序返回
    pub fn get(
        &self,
        ty: &TargetType,
    ) -> Option<&[ErrorDescriptor]> {
        self.entries.get(ty).map(Vec::as_slice)
    }

    #[inline]
    pub fn contains(
        &self,
        ty: &TargetType,
    ) -> bool {
        self.entries.contains_key(ty)
    }

    /// 已扫描的类型数
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按首次扫描顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&TargetType, &[ErrorDescriptor])> {
        self.entries.iter().map(|(ty, list)| (ty, list.as_slice()))
    }
}
