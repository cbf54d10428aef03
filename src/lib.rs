//! mcbselect - 低压微型断路器（MCB）选型核心
//! 目录索引、参数对比排名、市场依据解析与标签规范化

// 导出全局错误类型
pub use self::error::{McbError, McbResult};

// 导出配置模块
pub use self::config::{
    CatalogSource, ConfigManager, CustomConfigBuilder, PortalConfig, RankScope,
    MAX_COMPARE_PRODUCTS,
};

// 导出目录模块核心接口
pub use self::catalog::{
    Catalog, CatalogCache, CatalogLoader, CatalogStore, ComparisonRecord, ComparisonRow,
    ComparisonRowKey, EvidenceRef, EvidenceSource, Manufacturer, ManufacturerId, Product,
    ProductVariant, RationaleTag, Segment, Specification, COMPARISON_ROWS,
};

// 导出对比模块核心接口
pub use self::compare::{
    BestByRow, CompareSelection, ComparisonColumn, expand_columns, rank_best, rank_best_scoped,
};

// 导出依据模块核心接口
pub use self::rationale::{
    EvidenceEntry, EvidenceGroup, MarketLabels, MarketRow, MarketSection, build_market_sections,
};

// 导出工具模块核心接口
pub use self::utils::normalize_tags;

// 导出校验模块核心接口
pub use self::validator::{CatalogValidator, ValidationIssue, ValidationReport, ValidationRules};

// 导出门面
pub use self::portal::{ComparisonView, McbPortal};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod catalog;
pub mod compare;
pub mod rationale;
pub mod utils;
pub mod validator;
pub mod portal;
