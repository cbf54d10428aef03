//! 依据模块：标签依据解析与市场视图构建
pub mod resolver;
pub mod market;

pub use self::resolver::{
    EvidenceEntry, EvidenceGroup, EvidenceTarget, count_resolvable_refs, dedupe_evidence_entries,
    resolve_evidence_entry, resolve_evidence_group,
};
pub use self::market::{
    DefaultFocus, MarketCompactTag, MarketLabels, MarketRow, MarketSection, build_market_section,
    build_market_sections, build_product_rows, default_focus,
};
