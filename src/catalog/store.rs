//! 目录索引存储
//! 加载时一次性构建索引（按厂商、按 厂商::细分市场 复合键、按产品ID），之后全部为只读查询

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::model::{Catalog, Manufacturer, ManufacturerId, Product, Segment};

/// 复合键：厂商::细分市场
fn segment_key(manufacturer_id: ManufacturerId, segment_id: &str) -> String {
    format!("{}::{}", manufacturer_id, segment_id)
}

/// 目录存储（只读）
/// 索引中只保存下标，顺序即目录声明顺序（细分市场内按 productIds 优先）
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalog: Catalog,
    products_by_manufacturer: FxHashMap<ManufacturerId, Vec<usize>>,
    products_by_segment: FxHashMap<String, Vec<usize>>,
    product_by_id: FxHashMap<String, usize>,
    segments_by_manufacturer: FxHashMap<ManufacturerId, Vec<usize>>,
    segment_by_id: FxHashMap<String, usize>,
}

impl CatalogStore {
    /// 基于完整目录构建索引
    pub fn new(catalog: Catalog) -> Self {
        let mut products_by_manufacturer: FxHashMap<ManufacturerId, Vec<usize>> = FxHashMap::default();
        let mut products_by_segment: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut product_by_id: FxHashMap<String, usize> = FxHashMap::default();
        let mut segments_by_manufacturer: FxHashMap<ManufacturerId, Vec<usize>> = FxHashMap::default();
        let mut segment_by_id: FxHashMap<String, usize> = FxHashMap::default();

        for (idx, product) in catalog.products.iter().enumerate() {
            products_by_manufacturer
                .entry(product.manufacturer_id)
                .or_default()
                .push(idx);
            products_by_segment
                .entry(segment_key(product.manufacturer_id, &product.segment_id))
                .or_default()
                .push(idx);

            // 重复ID：保留首次声明，校验器负责报告
            if product_by_id.contains_key(&product.id) {
                warn!("Duplicate product id [{}], keeping first declaration", product.id);
            } else {
                product_by_id.insert(product.id.clone(), idx);
            }
        }

        for (idx, segment) in catalog.segments.iter().enumerate() {
            segments_by_manufacturer
                .entry(segment.manufacturer_id)
                .or_default()
                .push(idx);
            segment_by_id
                .entry(segment_key(segment.manufacturer_id, &segment.id))
                .or_insert(idx);
        }

        // productIds 声明了顺序时按其排序，未列出的产品保持声明顺序排在最后
        for segment in catalog.segments.iter().filter(|segment| !segment.product_ids.is_empty()) {
            if let Some(indexes) = products_by_segment.get_mut(&segment_key(segment.manufacturer_id, &segment.id)) {
                indexes.sort_by_key(|&idx| {
                    segment
                        .product_ids
                        .iter()
                        .position(|id| *id == catalog.products[idx].id)
                        .unwrap_or(usize::MAX)
                });
            }
        }

        debug!(
            "Catalog indexed: {} manufacturers, {} segments, {} products",
            catalog.manufacturers.len(),
            catalog.segments.len(),
            catalog.products.len()
        );

        Self {
            catalog,
            products_by_manufacturer,
            products_by_segment,
            product_by_id,
            segments_by_manufacturer,
            segment_by_id,
        }
    }

    /// 原始目录
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 全部厂商（声明顺序，不过滤）
    pub fn manufacturers(&self) -> &[Manufacturer] {
        &self.catalog.manufacturers
    }

    pub fn manufacturer_by_id(&self, manufacturer_id: ManufacturerId) -> Option<&Manufacturer> {
        self.catalog
            .manufacturers
            .iter()
            .find(|manufacturer| manufacturer.id == manufacturer_id)
    }

    /// 默认厂商：首个启用的厂商
    pub fn default_manufacturer(&self) -> Option<&Manufacturer> {
        self.catalog
            .manufacturers
            .iter()
            .find(|manufacturer| manufacturer.enabled)
    }

    /// 厂商下的细分市场；无则返回空列表
    pub fn segments_by_manufacturer(&self, manufacturer_id: ManufacturerId) -> Vec<&Segment> {
        self.segments_by_manufacturer
            .get(&manufacturer_id)
            .map(|indexes| indexes.iter().map(|&idx| &self.catalog.segments[idx]).collect())
            .unwrap_or_default()
    }

    pub fn segment_by_id(&self, manufacturer_id: ManufacturerId, segment_id: &str) -> Option<&Segment> {
        self.segment_by_id
            .get(&segment_key(manufacturer_id, segment_id))
            .map(|&idx| &self.catalog.segments[idx])
    }

    /// 厂商下的产品；无则返回空列表
    pub fn products_by_manufacturer(&self, manufacturer_id: ManufacturerId) -> Vec<&Product> {
        self.products_by_manufacturer
            .get(&manufacturer_id)
            .map(|indexes| self.resolve_products(indexes))
            .unwrap_or_default()
    }

    /// 细分市场下的产品；无则返回空列表
    pub fn products_by_segment(&self, manufacturer_id: ManufacturerId, segment_id: &str) -> Vec<&Product> {
        self.products_by_segment
            .get(&segment_key(manufacturer_id, segment_id))
            .map(|indexes| self.resolve_products(indexes))
            .unwrap_or_default()
    }

    /// 按ID查找产品；不存在属于正常情况（如过期的选择）
    pub fn product_by_id(&self, product_id: &str) -> Option<&Product> {
        self.product_by_id
            .get(product_id)
            .map(|&idx| &self.catalog.products[idx])
    }

    fn resolve_products(&self, indexes: &[usize]) -> Vec<&Product> {
        indexes.iter().map(|&idx| &self.catalog.products[idx]).collect()
    }
}

impl From<Catalog> for CatalogStore {
    fn from(catalog: Catalog) -> Self {
        Self::new(catalog)
    }
}
