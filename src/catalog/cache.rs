//! 目录快照管理
//! 仅处理目录的本地序列化（MessagePack）和反序列化

use rmp_serde::{from_slice, to_vec_named};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::model::Catalog;
use crate::error::{McbError, McbResult};

/// 目录快照管理器
pub struct CatalogCache;

impl CatalogCache {
    /// 从快照文件加载目录
    pub fn load(path: &Path) -> McbResult<Catalog> {
        let data = fs::read(path)?;
        let catalog = Self::decode(&data)?;
        debug!(
            "Snapshot decoded from {}: {} products, {} segments",
            path.display(),
            catalog.products.len(),
            catalog.segments.len()
        );
        Ok(catalog)
    }

    /// 将目录写入快照文件
    pub fn save(path: &Path, catalog: &Catalog) -> McbResult<()> {
        let data = Self::encode(catalog)?;
        debug!("Snapshot encoded, {} bytes", data.len());

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }

    /// 按字段名编码（结构体编码为 map，字段缺省值可安全回读）
    pub fn encode(catalog: &Catalog) -> McbResult<Vec<u8>> {
        to_vec_named(catalog).map_err(|e| McbError::SnapshotError(format!("encode failed: {}", e)))
    }

    pub fn decode(data: &[u8]) -> McbResult<Catalog> {
        from_slice(data).map_err(|e| McbError::SnapshotError(format!("decode failed: {}", e)))
    }

    /// 删除快照文件
    pub fn clear(path: &Path) -> McbResult<()> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
