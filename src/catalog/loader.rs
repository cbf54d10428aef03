//! 目录加载器
//! 负责从 JSON 目录结构、单个 JSON 文档或 MessagePack 快照加载目录

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::cache::CatalogCache;
use super::model::{Catalog, Manufacturer, Product, Segment};
use crate::config::CatalogSource;
use crate::error::{McbError, McbResult};

/// 厂商列表文件名
pub const MANUFACTURERS_FILE: &str = "manufacturers.json";
/// 细分市场列表文件名
pub const SEGMENTS_FILE: &str = "segments.json";

/// 目录加载器
pub struct CatalogLoader;

impl CatalogLoader {
    /// 按来源加载目录
    pub fn load(source: &CatalogSource) -> McbResult<Catalog> {
        let catalog = match source {
            CatalogSource::Directory(path) => Self::load_directory(path)?,
            CatalogSource::Document(path) => Self::load_document(path)?,
            CatalogSource::Snapshot(path) => CatalogCache::load(path)?,
        };

        info!(
            "Catalog loaded from {}: {} manufacturers, {} segments, {} products",
            source.path().display(),
            catalog.manufacturers.len(),
            catalog.segments.len(),
            catalog.products.len()
        );
        Ok(catalog)
    }

    /// 单个 JSON 文档
    pub fn load_document(path: &Path) -> McbResult<Catalog> {
        read_json(path)
    }

    /// 目录结构：
    /// - <root>/manufacturers.json
    /// - <root>/<厂商>/segments.json（仅包含此文件的子目录被视为厂商数据目录）
    /// - <root>/<厂商>/*.json 其余文件每个为一个产品，按文件名排序
    pub fn load_directory(root: &Path) -> McbResult<Catalog> {
        if !root.is_dir() {
            return Err(McbError::CatalogLoadError(format!(
                "catalog directory [{}] does not exist",
                root.display()
            )));
        }

        let manufacturers: Vec<Manufacturer> = read_json(&root.join(MANUFACTURERS_FILE))?;
        let mut segments: Vec<Segment> = Vec::new();
        let mut products: Vec<Product> = Vec::new();

        for dir in sorted_entries(root, |path| path.is_dir())? {
            let segments_path = dir.join(SEGMENTS_FILE);
            if !segments_path.is_file() {
                debug!("Skip [{}]: no {}", dir.display(), SEGMENTS_FILE);
                continue;
            }

            let dir_segments: Vec<Segment> = read_json(&segments_path)?;
            debug!("Loaded {} segments from {}", dir_segments.len(), segments_path.display());
            segments.extend(dir_segments);

            for file in sorted_entries(&dir, is_product_file)? {
                products.push(read_json(&file)?);
            }
        }

        Ok(Catalog {
            manufacturers,
            segments,
            products,
        })
    }
}

/// 产品文件：.json 且不是 segments.json，跳过 macOS 资源分叉文件 "._*"
fn is_product_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    path.is_file() && name.ends_with(".json") && name != SEGMENTS_FILE && !name.starts_with("._")
}

fn sorted_entries(dir: &Path, filter: impl Fn(&Path) -> bool) -> McbResult<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if filter(&path) {
            entries.push(path);
        }
    }
    entries.sort();
    Ok(entries)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> McbResult<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        McbError::CatalogLoadError(format!("read [{}] failed: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        McbError::CatalogParseError(format!("parse [{}] failed: {}", path.display(), e))
    })
}
