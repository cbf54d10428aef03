//! 门户门面：整合配置、目录存储与各项纯计算服务
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogLoader, CatalogStore, ComparisonRowKey, ManufacturerId};
use crate::compare::{
    BestByRow, ComparisonColumn, CompareSelection, expand_columns, is_best, rank_best_scoped,
};
use crate::config::PortalConfig;
use crate::error::McbResult;
use crate::rationale::{MarketSection, build_market_sections};
use crate::utils::normalize_tags;
use crate::validator::{CatalogValidator, ValidationReport};

/// 对比视图：展开后的列 + 各行最优列集合
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub columns: Vec<ComparisonColumn>,
    pub best: BestByRow,
}

impl ComparisonView {
    pub fn is_best(&self, key: ComparisonRowKey, column_id: &str) -> bool {
        is_best(&self.best, key, column_id)
    }
}

/// 选型门户
#[derive(Debug, Clone)]
pub struct McbPortal {
    store: Arc<CatalogStore>,
    config: PortalConfig,
}

impl McbPortal {
    /// 按配置中的目录来源加载目录并构建门户
    pub fn new(config: PortalConfig) -> McbResult<Self> {
        let catalog = CatalogLoader::load(&config.catalog_source)?;
        Ok(Self::with_catalog(catalog, config))
    }

    /// 基于已加载的目录构建门户
    pub fn with_catalog(catalog: Catalog, config: PortalConfig) -> Self {
        let store = Arc::new(CatalogStore::new(catalog));
        info!(
            "Portal ready: rank scope = {}, max compare products = {}",
            config.rank_scope, config.max_compare_products
        );
        Self { store, config }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// 共享存储句柄
    pub fn shared_store(&self) -> Arc<CatalogStore> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// 按配置上限创建空选择
    pub fn new_selection(&self) -> CompareSelection {
        CompareSelection::with_capacity(self.config.max_compare_products)
    }

    /// 由ID列表创建选择（丢弃未知ID、去重、截断）
    pub fn select<I, S>(&self, product_ids: I) -> CompareSelection
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = self.new_selection();
        selection.replace(product_ids, &self.store);
        selection
    }

    /// 对比选中产品
    pub fn compare(&self, selection: &CompareSelection) -> ComparisonView {
        let columns = expand_columns(selection.resolve(&self.store));
        let best = self.rank_best(&columns);
        debug!(
            "Compared {} products as {} columns",
            selection.len(),
            columns.len()
        );
        ComparisonView { columns, best }
    }

    /// 按配置的排名范围计算最优列
    pub fn rank_best(&self, columns: &[ComparisonColumn]) -> BestByRow {
        rank_best_scoped(columns, self.config.rank_scope)
    }

    pub fn market_sections(&self, manufacturer_id: ManufacturerId) -> Vec<MarketSection> {
        build_market_sections(&self.store, manufacturer_id, &self.config.market_labels)
    }

    /// 按文本ID查询市场分区；未知厂商ID返回错误
    pub fn market_sections_for(&self, manufacturer_id: &str) -> McbResult<Vec<MarketSection>> {
        let manufacturer_id: ManufacturerId = manufacturer_id.parse()?;
        Ok(self.market_sections(manufacturer_id))
    }

    /// 默认厂商（首个启用的厂商）
    pub fn default_manufacturer(&self) -> Option<ManufacturerId> {
        self.store.default_manufacturer().map(|manufacturer| manufacturer.id)
    }

    pub fn normalize_tags<I, S>(&self, raw: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        normalize_tags(raw)
    }

    /// 使用默认规则校验当前目录
    pub fn validate(&self) -> ValidationReport {
        CatalogValidator::new().validate(self.store.catalog())
    }
}
