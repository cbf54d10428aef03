//! 市场视图构建
//! 为某厂商的每个细分市场重建市场分区：逐产品（或逐变体）解析依据标签，
//! 汇总紧凑标签的"有依据"标记，并选出默认聚焦项

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use super::resolver::{EvidenceGroup, EvidenceTarget, resolve_evidence_group};
use crate::catalog::{
    CatalogStore, ComparisonRecord, ComparisonRowKey, ManufacturerId, NOT_APPLICABLE, Product,
    RationaleTag, Segment,
};
use crate::compare::variant_column_id;
use crate::utils::normalize_tags;

/// 市场显示名：优先使用按细分市场ID的覆盖值，否则为 "<细分市场名><后缀>"
#[derive(Debug, Clone)]
pub struct MarketLabels {
    pub overrides: FxHashMap<String, String>,
    pub suffix: String,
}

impl Default for MarketLabels {
    fn default() -> Self {
        let overrides = [
            ("residential", "Residential market"),
            ("commercial-building", "Commercial / Building market"),
            ("industrial", "Industrial market"),
            ("oem-machine-building", "OEM / Machine Building market"),
            ("pv-renewables", "PV / Renewables market"),
        ]
        .into_iter()
        .map(|(id, label)| (id.to_string(), label.to_string()))
        .collect();

        Self {
            overrides,
            suffix: " market".to_string(),
        }
    }
}

impl MarketLabels {
    /// 无覆盖值，仅使用后缀（如日文 "市場"）
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            overrides: FxHashMap::default(),
            suffix: suffix.into(),
        }
    }

    pub fn with_override(mut self, segment_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.overrides.insert(segment_id.into(), label.into());
        self
    }

    /// 永不失败，总能得到一个显示名
    pub fn market_name(&self, segment: &Segment) -> String {
        match self.overrides.get(&segment.id) {
            Some(label) => label.clone(),
            None => format!("{}{}", segment.name.trim(), self.suffix),
        }
    }
}

/// 紧凑标签（无依据时在界面上置灰、不可交互）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCompactTag {
    pub tag_id: String,
    pub tag_value: String,
    pub has_evidence: bool,
}

/// 市场分区中的一行（一个产品，或产品的一个变体）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRow {
    pub row_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub series: String,
    pub standards: String,
    pub breaking_capacity: String,
    pub rated_current: String,
    pub compact_tags: Vec<MarketCompactTag>,
    /// 按细分市场标签声明顺序，仅包含有依据的标签
    pub evidence_groups: Vec<EvidenceGroup>,
}

impl MarketRow {
    pub fn evidence_for(&self, tag_id: &str) -> Option<&EvidenceGroup> {
        self.evidence_groups.iter().find(|group| group.tag_id == tag_id)
    }
}

/// 默认聚焦项：首个有依据的 (行, 标签)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultFocus {
    pub row_id: String,
    pub product_id: String,
    pub tag_id: String,
}

/// 市场分区（派生数据，不存储）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSection {
    pub segment_id: String,
    pub market_name: String,
    pub summary_tags: Vec<String>,
    pub default_focus: Option<DefaultFocus>,
    pub rows: Vec<MarketRow>,
}

fn headline(comparison: &ComparisonRecord, key: ComparisonRowKey) -> String {
    comparison.get(key).unwrap_or(NOT_APPLICABLE).to_string()
}

fn build_row(
    row_id: String,
    product: &Product,
    variant_id: Option<String>,
    series: String,
    target: EvidenceTarget<'_>,
    tags: &[RationaleTag],
) -> MarketRow {
    let resolved: Vec<Option<EvidenceGroup>> = tags
        .iter()
        .map(|tag| resolve_evidence_group(target, tag))
        .collect();

    let compact_tags = tags
        .iter()
        .zip(&resolved)
        .map(|(tag, group)| MarketCompactTag {
            tag_id: tag.id.clone(),
            tag_value: tag.value.clone(),
            has_evidence: group.is_some(),
        })
        .collect();

    MarketRow {
        row_id,
        product_id: product.id.clone(),
        variant_id,
        series,
        standards: headline(target.comparison, ComparisonRowKey::StandardsApprovals),
        breaking_capacity: headline(target.comparison, ComparisonRowKey::BreakingCapacity),
        rated_current: headline(target.comparison, ComparisonRowKey::RatedCurrentIn),
        compact_tags,
        evidence_groups: resolved.into_iter().flatten().collect(),
    }
}

/// 某产品的市场行；有变体时每个变体一行（变体对比记录 + 产品规格）
pub fn build_product_rows(product: &Product, tags: &[RationaleTag]) -> Vec<MarketRow> {
    if !product.has_variants() {
        return vec![build_row(
            product.id.clone(),
            product,
            None,
            product.series.clone(),
            EvidenceTarget::from(product),
            tags,
        )];
    }

    product
        .variants
        .iter()
        .map(|variant| {
            let series = match variant.variant_label.trim() {
                "" => format!("{} ({})", product.series, variant.variant_id),
                label => format!("{} ({})", product.series, label),
            };
            build_row(
                variant_column_id(&product.id, &variant.variant_id),
                product,
                Some(variant.variant_id.clone()),
                series,
                EvidenceTarget::new(&variant.comparison, &product.specifications),
                tags,
            )
        })
        .collect()
}

/// 默认聚焦：按目录顺序的首行中，按细分市场声明顺序的首个有依据标签
pub fn default_focus(rows: &[MarketRow]) -> Option<DefaultFocus> {
    rows.iter().find_map(|row| {
        row.compact_tags
            .iter()
            .find(|tag| tag.has_evidence)
            .map(|tag| DefaultFocus {
                row_id: row.row_id.clone(),
                product_id: row.product_id.clone(),
                tag_id: tag.tag_id.clone(),
            })
    })
}

/// 构建单个细分市场分区
pub fn build_market_section(
    store: &CatalogStore,
    segment: &Segment,
    labels: &MarketLabels,
) -> MarketSection {
    let rows: Vec<MarketRow> = store
        .products_by_segment(segment.manufacturer_id, &segment.id)
        .into_iter()
        .flat_map(|product| build_product_rows(product, &segment.rationale_tags))
        .collect();

    MarketSection {
        segment_id: segment.id.clone(),
        market_name: labels.market_name(segment),
        summary_tags: normalize_tags(segment.rationale_tags.iter().map(|tag| tag.value.as_str())),
        default_focus: default_focus(&rows),
        rows,
    }
}

/// 构建某厂商全部细分市场的市场分区（细分市场声明顺序）
pub fn build_market_sections(
    store: &CatalogStore,
    manufacturer_id: ManufacturerId,
    labels: &MarketLabels,
) -> Vec<MarketSection> {
    let sections: Vec<MarketSection> = store
        .segments_by_manufacturer(manufacturer_id)
        .into_iter()
        .map(|segment| build_market_section(store, segment, labels))
        .collect();

    debug!(
        "Built {} market sections for {} ({} rows)",
        sections.len(),
        manufacturer_id,
        sections.iter().map(|section| section.rows.len()).sum::<usize>()
    );
    sections
}
