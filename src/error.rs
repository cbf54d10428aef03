//! 全局错误类型定义
//! 仅目录加载/快照读写会产生错误，对比排名与依据解析均为纯函数，不返回错误

use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum McbError {
    // 目录相关错误
    #[error("Catalog load failed: {0}")]
    CatalogLoadError(String),
    #[error("Catalog parse failed: {0}")]
    CatalogParseError(String),

    // 快照（MessagePack）相关错误
    #[error("Catalog snapshot failed: {0}")]
    SnapshotError(String),

    // 查询相关错误
    #[error("Unknown manufacturer: {0}")]
    UnknownManufacturer(String),

    // 序列化/反序列化错误
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO operation failed: {0}")]
    IoError(#[from] IoError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type McbResult<T> = Result<T, McbError>;
