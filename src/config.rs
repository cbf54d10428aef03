//! 全局配置管理,存储所有可配置项

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::McbError;
use crate::rationale::MarketLabels;

/// 默认目录路径
pub const DEFAULT_CATALOG_DIR: &str = "data/catalog";

/// 对比表最多可同时选择的产品数
pub const MAX_COMPARE_PRODUCTS: usize = 5;

/// 目录来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Directory(PathBuf), // 目录：manufacturers.json + <厂商>/segments.json + <厂商>/*.json
    Document(PathBuf),  // 单个 JSON 文档 {manufacturers, segments, products}
    Snapshot(PathBuf),  // MessagePack 快照
}

impl CatalogSource {
    /// 按路径形态推断来源：目录 → Directory，.mp/.msgpack → Snapshot，其余 → Document
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            return CatalogSource::Directory(path);
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("mp") | Some("msgpack") => CatalogSource::Snapshot(path),
            _ => CatalogSource::Document(path),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            CatalogSource::Directory(path)
            | CatalogSource::Document(path)
            | CatalogSource::Snapshot(path) => path,
        }
    }
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::Directory(PathBuf::from(DEFAULT_CATALOG_DIR))
    }
}

/// 变体排名范围
/// AcrossSelection：所有列与整个选择集比较（默认）
/// WithinProduct：按所属产品分组，仅在同一产品的变体之间比较
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankScope {
    #[default]
    AcrossSelection,
    WithinProduct,
}

impl fmt::Display for RankScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankScope::AcrossSelection => write!(f, "across"),
            RankScope::WithinProduct => write!(f, "within"),
        }
    }
}

impl FromStr for RankScope {
    type Err = McbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "across" | "across-selection" => Ok(RankScope::AcrossSelection),
            "within" | "within-product" => Ok(RankScope::WithinProduct),
            other => Err(McbError::InvalidInput(format!("unknown rank scope '{}'", other))),
        }
    }
}

/// 门户配置
#[derive(Debug, Clone)]
pub struct PortalConfig {
    // 目录来源
    pub catalog_source: CatalogSource,
    // 对比选择上限
    pub max_compare_products: usize,
    // 变体排名范围
    pub rank_scope: RankScope,
    // 市场显示名
    pub market_labels: MarketLabels,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            catalog_source: CatalogSource::default(),
            max_compare_products: MAX_COMPARE_PRODUCTS,
            rank_scope: RankScope::default(),
            market_labels: MarketLabels::default(),
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> PortalConfig {
        PortalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: PortalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog_source(mut self, source: CatalogSource) -> Self {
        self.config.catalog_source = source;
        self
    }

    /// 上限至少为 1
    pub fn max_compare_products(mut self, max: usize) -> Self {
        self.config.max_compare_products = max.max(1);
        self
    }

    pub fn rank_scope(mut self, scope: RankScope) -> Self {
        self.config.rank_scope = scope;
        self
    }

    pub fn market_labels(mut self, labels: MarketLabels) -> Self {
        self.config.market_labels = labels;
        self
    }

    pub fn build(self) -> PortalConfig {
        self.config
    }
}
