//! # Host Error 模块
//!
//! 宿主层错误：配置文件读取、时间线解析，以及运行时配置错误的透传。

use std::path::PathBuf;

use anim_runtime::AnimError;
use thiserror::Error;

/// 宿主错误
#[derive(Error, Debug)]
pub enum HostError {
    /// 配置文件读取失败
    #[error("读取配置文件失败: {} - {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件不是合法的 JSON 或字段不匹配
    #[error("解析配置文件失败: {} - {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 动画配置无效
    #[error(transparent)]
    Anim(#[from] AnimError),

    /// 时间线条目无效
    #[error("无效的时间线条目 '{entry}': {message}")]
    Timeline { entry: String, message: String },
}

/// Result 类型别名
pub type HostResult<T> = Result<T, HostError>;
