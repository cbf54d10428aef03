//! 目录模块：负责目录的数据模型、加载、快照与索引
pub mod model;
pub mod loader;
pub mod cache;
pub mod store;

// 导出核心接口
pub use self::model::{
    Catalog, ComparisonRecord, ComparisonRow, ComparisonRowKey, EvidenceRef, EvidenceSource,
    Manufacturer, ManufacturerId, Product, ProductVariant, RationaleTag, Segment, Specification,
    COMPARISON_ROWS, NOT_APPLICABLE, is_absent,
};
pub use self::loader::CatalogLoader;
pub use self::cache::CatalogCache;
pub use self::store::CatalogStore;
