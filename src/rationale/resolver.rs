//! 依据解析模块
//! 将细分市场依据标签的每条依据引用，解析为某产品上的具体字段值
//! 无法解析的引用静默丢弃；同一标签的条目按 (label, value, note) 精确去重，保留首次出现顺序

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::catalog::{
    ComparisonRecord, EvidenceRef, EvidenceSource, Product, RationaleTag, Specification, is_absent,
};

/// 单条依据
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceEntry {
    pub label: String,
    pub value: String,
    pub note: Option<String>,
}

/// 某标签在某产品上的依据组
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceGroup {
    pub tag_id: String,
    pub tag_value: String,
    pub reason: String,
    pub entries: Vec<EvidenceEntry>,
}

/// 依据解析的目标：对比记录 + 规格列表
/// 变体行使用变体自己的对比记录，规格沿用所属产品
#[derive(Debug, Clone, Copy)]
pub struct EvidenceTarget<'a> {
    pub comparison: &'a ComparisonRecord,
    pub specifications: &'a [Specification],
}

impl<'a> EvidenceTarget<'a> {
    pub fn new(comparison: &'a ComparisonRecord, specifications: &'a [Specification]) -> Self {
        Self {
            comparison,
            specifications,
        }
    }
}

impl<'a> From<&'a Product> for EvidenceTarget<'a> {
    fn from(product: &'a Product) -> Self {
        Self::new(&product.comparison, &product.specifications)
    }
}

/// 对比来源：键有效、字段存在且不是 "N/A"
fn resolve_comparison(target: EvidenceTarget<'_>, reference: &EvidenceRef) -> Option<EvidenceEntry> {
    let key = reference.comparison_key()?;
    let value = target.comparison.get(key)?;
    Some(EvidenceEntry {
        label: key.label().to_string(),
        value: value.to_string(),
        note: reference.note.clone(),
    })
}

/// 规格来源：首个同名规格，非空且不是 "N/A"
fn resolve_specification(target: EvidenceTarget<'_>, reference: &EvidenceRef) -> Option<EvidenceEntry> {
    let label = reference.label.as_deref()?;
    let specification = target.specifications.iter().find(|spec| spec.label == label)?;
    if is_absent(&specification.value) {
        return None;
    }
    Some(EvidenceEntry {
        label: specification.label.clone(),
        value: specification.value.clone(),
        note: reference.note.clone(),
    })
}

/// 解析单条依据引用
pub fn resolve_evidence_entry(target: EvidenceTarget<'_>, reference: &EvidenceRef) -> Option<EvidenceEntry> {
    match reference.source {
        EvidenceSource::Comparison => resolve_comparison(target, reference),
        EvidenceSource::Specification => resolve_specification(target, reference),
    }
}

/// 精确去重，保留首次出现顺序
pub fn dedupe_evidence_entries(entries: Vec<EvidenceEntry>) -> Vec<EvidenceEntry> {
    let mut seen: FxHashSet<EvidenceEntry> = FxHashSet::default();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

/// 解析标签的依据组；无任何有效条目时返回 None（该标签对此产品"无依据"）
pub fn resolve_evidence_group(target: EvidenceTarget<'_>, tag: &RationaleTag) -> Option<EvidenceGroup> {
    let entries = dedupe_evidence_entries(
        tag.evidence_refs
            .iter()
            .filter_map(|reference| resolve_evidence_entry(target, reference))
            .collect(),
    );

    if entries.is_empty() {
        return None;
    }

    Some(EvidenceGroup {
        tag_id: tag.id.clone(),
        tag_value: tag.value.clone(),
        reason: tag.reason.clone(),
        entries,
    })
}

/// 可解析的引用条数（去重前），校验器用于判断产品是否完全无依据
pub fn count_resolvable_refs(target: EvidenceTarget<'_>, references: &[EvidenceRef]) -> usize {
    references
        .iter()
        .filter(|reference| resolve_evidence_entry(target, reference).is_some())
        .count()
}
