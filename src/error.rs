//! 全局错误类型定义

use thiserror::Error;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum InterventionError {
    // 字典相关错误
    #[error("字典目录不存在：{0}")]
    DictDirNotFound(String),
    #[error("字典目录扫描失败：{0}")]
    CatalogScanError(String),

    // 外部工具相关错误
    #[error("外部工具未安装或不在 PATH 中：{0}")]
    ToolNotFound(String),
    #[error("外部工具执行失败：{0}")]
    ToolExecError(String),

    // 仓库预备相关错误
    #[error("仓库克隆失败：{0}")]
    CloneError(String),

    // 结果输出相关错误
    #[error("结果保存失败：{0}")]
    ReportError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type IvResult<T> = Result<T, InterventionError>;
