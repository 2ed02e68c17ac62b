//! Runtime status error
//!
//! Generated constructors produce [`StatusErr`] values. Message templates are
//! stored untouched; the visible message is always re-rendered from the
//! selected locale's template and the last arguments passed to
//! [`StatusErr::with_args`].
//!
//! # Usage
//!
//! ```rust
//! use statuserr::StatusErr;
//!
//! let err = StatusErr::new("UserNotFound", 404001, "用户 %s 不存在", "user %s not found")
//!     .localize("en")
//!     .with_args(&[&"alice"]);
//! assert_eq!(err.to_string(), "[UserNotFound][404001] user alice not found");
//! assert_eq!(err.status_code(), 404);
//! ```

pub mod format;
pub mod status_code;

pub use format::sprintf;
pub use status_code::status_code;

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// 消息语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    /// 不区分大小写地识别 `zh` / `en`，其余一律回落到中文
    pub fn parse(lang: &str) -> Self {
        match lang.to_ascii_lowercase().as_str() {
            "en" => Locale::En,
            _ => Locale::Zh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }
}

impl Display for Locale {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 统一错误约定
pub trait CommonError: std::error::Error {
    /// 错误码
    fn code(&self) -> i64;

    /// 错误码前三位
    fn status_code(&self) -> i64 {
        status_code(self.code())
    }

    /// 切换消息语言
    fn localize(
        self,
        lang: &str,
    ) -> Self
    where
        Self: Sized;

    /// 填充消息模板参数
    fn with_args(
        self,
        args: &[&dyn Display],
    ) -> Self
    where
        Self: Sized;
}

/// 可本地化的状态错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("[{key}][{error_code}] {message}")]
pub struct StatusErr {
    /// 错误名称
    key: String,
    /// 错误码
    #[serde(rename = "code")]
    error_code: i64,
    /// 当前消息
    message: String,
    /// 中文模板
    #[serde(skip)]
    zh_message: String,
    /// 英文模板
    #[serde(skip)]
    en_message: String,
    #[serde(skip)]
    locale: Locale,
    /// 调用过 `with_args` 后才有值，空切片也算
    #[serde(skip)]
    args: Option<Vec<String>>,
}

impl StatusErr {
    /// 创建状态错误，消息默认取中文模板
    pub fn new(
        key: impl Into<String>,
        error_code: i64,
        zh_message: impl Into<String>,
        en_message: impl Into<String>,
    ) -> Self {
        let zh_message = zh_message.into();
        Self {
            key: key.into(),
            error_code,
            message: zh_message.clone(),
            zh_message,
            en_message: en_message.into(),
            locale: Locale::Zh,
            args: None,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn code(&self) -> i64 {
        self.error_code
    }

    /// 错误码前三位，不足三位为 0
    #[inline]
    pub fn status_code(&self) -> i64 {
        status_code(self.error_code)
    }

    /// 当前已渲染的消息
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn zh_message(&self) -> &str {
        &self.zh_message
    }

    #[inline]
    pub fn en_message(&self) -> &str {
        &self.en_message
    }

    #[inline]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// `[Key][code]`
    pub fn summary(&self) -> String {
        format!("[{}][{}]", self.key, self.error_code)
    }

    /// 切换语言；无法识别的语言回落到中文
    pub fn localize(
        mut self,
        lang: &str,
    ) -> Self {
        self.locale = Locale::parse(lang);
        self.resolve();
        self
    }

    /// 填充模板参数
    ///
    /// 每次调用都从原始模板重新渲染，多次调用只保留最后一组参数。
    pub fn with_args(
        mut self,
        args: &[&dyn Display],
    ) -> Self {
        self.args = Some(args.iter().map(|a| a.to_string()).collect());
        self.resolve();
        self
    }

    /// JSON 形式：`{"key": .., "code": .., "message": ..}`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn template(&self) -> &str {
        match self.locale {
            Locale::Zh => &self.zh_message,
            Locale::En => &self.en_message,
        }
    }

    fn resolve(&mut self) {
        // 反序列化得到的值没有模板，保留原消息
        if self.zh_message.is_empty() && self.en_message.is_empty() {
            return;
        }
        self.message = match &self.args {
            Some(args) if !self.template().is_empty() => sprintf(self.template(), args.as_slice()),
            _ => self.template().to_string(),
        };
    }
}

impl CommonError for StatusErr {
    fn code(&self) -> i64 {
        self.error_code
    }

    fn localize(
        self,
        lang: &str,
    ) -> Self {
        StatusErr::localize(self, lang)
    }

    fn with_args(
        self,
        args: &[&dyn Display],
    ) -> Self {
        StatusErr::with_args(self, args)
    }
}
