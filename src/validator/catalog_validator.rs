//! 目录完整性校验
//! 离线数据质量门禁：检查细分市场、依据标签、依据引用与产品之间的引用完整性
//! 校验只报告问题，不修改目录

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{
    Catalog, ComparisonRowKey, EvidenceSource, ManufacturerId, Product, RationaleTag, Segment,
};
use crate::rationale::{EvidenceTarget, count_resolvable_refs, resolve_evidence_group};

/// 校验规则
#[derive(Debug, Clone)]
pub struct ValidationRules {
    /// 细分市场ID → 必须被依据标签覆盖的对比键
    pub required_segment_keys: FxHashMap<String, Vec<ComparisonRowKey>>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        let mut required_segment_keys = FxHashMap::default();
        required_segment_keys.insert(
            "residential".to_string(),
            vec![
                ComparisonRowKey::StandardsApprovals,
                ComparisonRowKey::BreakingCapacity,
                ComparisonRowKey::RatedCurrentIn,
            ],
        );
        required_segment_keys.insert(
            "industrial".to_string(),
            vec![
                ComparisonRowKey::StandardsApprovals,
                ComparisonRowKey::BreakingCapacity,
                ComparisonRowKey::ServiceBreakingCapacityIcs,
            ],
        );
        Self { required_segment_keys }
    }
}

impl ValidationRules {
    /// 无必需键
    pub fn empty() -> Self {
        Self {
            required_segment_keys: FxHashMap::default(),
        }
    }

    pub fn require(mut self, segment_id: impl Into<String>, keys: Vec<ComparisonRowKey>) -> Self {
        self.required_segment_keys.insert(segment_id.into(), keys);
        self
    }
}

/// 细分市场定位（厂商 + 细分市场ID）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRef {
    pub manufacturer_id: ManufacturerId,
    pub segment_id: String,
}

impl From<&Segment> for SegmentRef {
    fn from(segment: &Segment) -> Self {
        Self {
            manufacturer_id: segment.manufacturer_id,
            segment_id: segment.id.clone(),
        }
    }
}

impl fmt::Display for SegmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.manufacturer_id, self.segment_id)
    }
}

/// 校验问题
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationIssue {
    #[error("segment={segment} has no products")]
    EmptySegment { segment: SegmentRef },

    #[error("segment={segment} has no rationale tags")]
    MissingRationaleTags { segment: SegmentRef },

    #[error("segment={segment} tag={tag_id} is missing id/value/reason")]
    IncompleteTag { segment: SegmentRef, tag_id: String },

    #[error("segment={segment} tag={tag_id} has no evidence refs")]
    TagWithoutEvidence { segment: SegmentRef, tag_id: String },

    #[error("segment={segment} tag={tag_id} comparison ref has no key")]
    ComparisonRefMissingKey { segment: SegmentRef, tag_id: String },

    #[error("segment={segment} tag={tag_id} comparison key={key} is invalid")]
    UnknownComparisonKey { segment: SegmentRef, tag_id: String, key: String },

    #[error("segment={segment} tag={tag_id} specification ref has no label")]
    SpecificationRefMissingLabel { segment: SegmentRef, tag_id: String },

    #[error("segment={segment} tag={tag_id} specification label='{label}' not found on any product")]
    SpecificationLabelNotFound { segment: SegmentRef, tag_id: String, label: String },

    #[error("segment={segment} has no evidence for required comparison key={key}")]
    RequiredKeyNotCovered { segment: SegmentRef, key: ComparisonRowKey },

    #[error("segment={segment} tag={tag_id} resolves on no product")]
    UnresolvedTag { segment: SegmentRef, tag_id: String },

    #[error("product={product_id} resolves no evidence refs")]
    UnresolvedProduct { product_id: String },

    #[error("product={product_id} is defined more than once")]
    DuplicateProductId { product_id: String },

    #[error("product={product_id} references unknown manufacturer={manufacturer_id}")]
    UnknownProductManufacturer { product_id: String, manufacturer_id: ManufacturerId },

    #[error("product={product_id} references unknown segment={segment}")]
    UnknownProductSegment { product_id: String, segment: SegmentRef },

    #[error("segment={segment} lists unknown product={product_id}")]
    DanglingSegmentProduct { segment: SegmentRef, product_id: String },
}

/// 校验报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub segment_count: usize,
    pub product_count: usize,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// 单行摘要
    pub fn summary(&self) -> String {
        if self.is_ok() {
            format!("OK: {} segments, {} products", self.segment_count, self.product_count)
        } else {
            format!("NG: {} issues", self.issues.len())
        }
    }
}

/// 目录校验器
#[derive(Debug, Clone, Default)]
pub struct CatalogValidator {
    rules: ValidationRules,
}

impl CatalogValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// 执行全部检查
    pub fn validate(&self, catalog: &Catalog) -> ValidationReport {
        let mut issues = Vec::new();
        check_products(catalog, &mut issues);

        for segment in &catalog.segments {
            self.check_segment(catalog, segment, &mut issues);
        }

        debug!(
            "Validated catalog: {} segments, {} products, {} issues",
            catalog.segments.len(),
            catalog.products.len(),
            issues.len()
        );

        ValidationReport {
            issues,
            segment_count: catalog.segments.len(),
            product_count: catalog.products.len(),
        }
    }

    fn check_segment(&self, catalog: &Catalog, segment: &Segment, issues: &mut Vec<ValidationIssue>) {
        let segment_ref = SegmentRef::from(segment);

        for product_id in &segment.product_ids {
            if !catalog.products.iter().any(|product| product.id == *product_id) {
                issues.push(ValidationIssue::DanglingSegmentProduct {
                    segment: segment_ref.clone(),
                    product_id: product_id.clone(),
                });
            }
        }

        let products: Vec<&Product> = catalog
            .products
            .iter()
            .filter(|product| {
                product.manufacturer_id == segment.manufacturer_id && product.segment_id == segment.id
            })
            .collect();

        // 无产品或无标签时跳过后续检查
        if products.is_empty() {
            issues.push(ValidationIssue::EmptySegment { segment: segment_ref });
            return;
        }
        if segment.rationale_tags.is_empty() {
            issues.push(ValidationIssue::MissingRationaleTags { segment: segment_ref });
            return;
        }

        let mut covered: FxHashSet<ComparisonRowKey> = FxHashSet::default();
        for tag in &segment.rationale_tags {
            check_tag(&segment_ref, tag, &products, &mut covered, issues);
        }

        if let Some(required) = self.rules.required_segment_keys.get(&segment.id) {
            for key in required {
                if !covered.contains(key) {
                    issues.push(ValidationIssue::RequiredKeyNotCovered {
                        segment: segment_ref.clone(),
                        key: *key,
                    });
                }
            }
        }

        // 每个有引用的标签至少要在一个产品（或变体）上产生依据
        for tag in segment.rationale_tags.iter().filter(|tag| !tag.evidence_refs.is_empty()) {
            let resolved = products.iter().any(|product| {
                evidence_targets(product)
                    .into_iter()
                    .any(|target| resolve_evidence_group(target, tag).is_some())
            });
            if !resolved {
                issues.push(ValidationIssue::UnresolvedTag {
                    segment: segment_ref.clone(),
                    tag_id: tag.id.clone(),
                });
            }
        }

        for product in products {
            if resolvable_ref_count(product, &segment.rationale_tags) == 0 {
                issues.push(ValidationIssue::UnresolvedProduct {
                    product_id: product.id.clone(),
                });
            }
        }
    }
}

/// 产品级检查：重复ID、未知厂商、未知细分市场
fn check_products(catalog: &Catalog, issues: &mut Vec<ValidationIssue>) {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut reported: FxHashSet<&str> = FxHashSet::default();

    for product in &catalog.products {
        if !seen.insert(product.id.as_str()) && reported.insert(product.id.as_str()) {
            issues.push(ValidationIssue::DuplicateProductId {
                product_id: product.id.clone(),
            });
        }

        if !catalog
            .manufacturers
            .iter()
            .any(|manufacturer| manufacturer.id == product.manufacturer_id)
        {
            issues.push(ValidationIssue::UnknownProductManufacturer {
                product_id: product.id.clone(),
                manufacturer_id: product.manufacturer_id,
            });
        }

        if !catalog.segments.iter().any(|segment| {
            segment.manufacturer_id == product.manufacturer_id && segment.id == product.segment_id
        }) {
            issues.push(ValidationIssue::UnknownProductSegment {
                product_id: product.id.clone(),
                segment: SegmentRef {
                    manufacturer_id: product.manufacturer_id,
                    segment_id: product.segment_id.clone(),
                },
            });
        }
    }
}

fn check_tag(
    segment: &SegmentRef,
    tag: &RationaleTag,
    products: &[&Product],
    covered: &mut FxHashSet<ComparisonRowKey>,
    issues: &mut Vec<ValidationIssue>,
) {
    let tag_id = if tag.id.trim().is_empty() { "unknown" } else { tag.id.as_str() };

    if tag.id.trim().is_empty() || tag.value.trim().is_empty() || tag.reason.trim().is_empty() {
        issues.push(ValidationIssue::IncompleteTag {
            segment: segment.clone(),
            tag_id: tag_id.to_string(),
        });
    }

    if tag.evidence_refs.is_empty() {
        issues.push(ValidationIssue::TagWithoutEvidence {
            segment: segment.clone(),
            tag_id: tag_id.to_string(),
        });
        return;
    }

    for reference in &tag.evidence_refs {
        match reference.source {
            EvidenceSource::Comparison => {
                let Some(key) = reference.key.as_deref().filter(|key| !key.trim().is_empty()) else {
                    issues.push(ValidationIssue::ComparisonRefMissingKey {
                        segment: segment.clone(),
                        tag_id: tag_id.to_string(),
                    });
                    continue;
                };
                match key.parse::<ComparisonRowKey>() {
                    Ok(parsed) => {
                        covered.insert(parsed);
                    }
                    Err(_) => issues.push(ValidationIssue::UnknownComparisonKey {
                        segment: segment.clone(),
                        tag_id: tag_id.to_string(),
                        key: key.to_string(),
                    }),
                }
            }
            EvidenceSource::Specification => {
                let Some(label) = reference.label.as_deref().filter(|label| !label.trim().is_empty()) else {
                    issues.push(ValidationIssue::SpecificationRefMissingLabel {
                        segment: segment.clone(),
                        tag_id: tag_id.to_string(),
                    });
                    continue;
                };
                let exists = products.iter().any(|product| product.specification(label).is_some());
                if !exists {
                    issues.push(ValidationIssue::SpecificationLabelNotFound {
                        segment: segment.clone(),
                        tag_id: tag_id.to_string(),
                        label: label.to_string(),
                    });
                }
            }
        }
    }
}

/// 产品自身与各变体的依据解析目标
fn evidence_targets(product: &Product) -> Vec<EvidenceTarget<'_>> {
    let mut targets = vec![EvidenceTarget::from(product)];
    targets.extend(
        product
            .variants
            .iter()
            .map(|variant| EvidenceTarget::new(&variant.comparison, &product.specifications)),
    );
    targets
}

/// 产品（含各变体）可解析的引用总数
fn resolvable_ref_count(product: &Product, tags: &[RationaleTag]) -> usize {
    evidence_targets(product)
        .into_iter()
        .map(|target| {
            tags.iter()
                .map(|tag| count_resolvable_refs(target, &tag.evidence_refs))
                .sum::<usize>()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ComparisonRecord, EvidenceRef, Manufacturer, Specification};

    fn manufacturer() -> Manufacturer {
        Manufacturer {
            id: ManufacturerId::SchneiderElectric,
            name: "Schneider Electric".to_string(),
            logo_url: String::new(),
            enabled: true,
            status_label: String::new(),
        }
    }

    fn comparison_ref(key: Option<&str>) -> EvidenceRef {
        EvidenceRef {
            source: EvidenceSource::Comparison,
            key: key.map(str::to_string),
            label: None,
            note: None,
        }
    }

    fn spec_ref(label: Option<&str>) -> EvidenceRef {
        EvidenceRef {
            source: EvidenceSource::Specification,
            key: None,
            label: label.map(str::to_string),
            note: None,
        }
    }

    fn tag(id: &str, refs: Vec<EvidenceRef>) -> RationaleTag {
        RationaleTag {
            id: id.to_string(),
            value: id.to_uppercase(),
            reason: "reason".to_string(),
            evidence_refs: refs,
        }
    }

    fn segment(id: &str, tags: Vec<RationaleTag>) -> Segment {
        Segment {
            id: id.to_string(),
            manufacturer_id: ManufacturerId::SchneiderElectric,
            name: id.to_string(),
            icon: String::new(),
            product_ids: Vec::new(),
            rationale_tags: tags,
        }
    }

    fn product(id: &str, segment_id: &str) -> Product {
        Product {
            id: id.to_string(),
            manufacturer_id: ManufacturerId::SchneiderElectric,
            segment_id: segment_id.to_string(),
            series: id.to_string(),
            comparison: ComparisonRecord {
                standards_approvals: "IEC 60898-1".to_string(),
                breaking_capacity: "6kA".to_string(),
                rated_current_in: "6-63A".to_string(),
                ..ComparisonRecord::default()
            },
            variants: Vec::new(),
            specifications: vec![Specification {
                label: "Network type".to_string(),
                value: "AC".to_string(),
            }],
        }
    }

    fn healthy() -> Catalog {
        Catalog {
            manufacturers: vec![manufacturer()],
            segments: vec![segment(
                "residential",
                vec![
                    tag("std", vec![comparison_ref(Some("standardsApprovals"))]),
                    tag("ka", vec![comparison_ref(Some("breakingCapacity"))]),
                    tag("in", vec![comparison_ref(Some("ratedCurrentIn")), spec_ref(Some("Network type"))]),
                ],
            )],
            products: vec![product("resi9", "residential")],
        }
    }

    #[test]
    fn test_healthy_catalog_passes() {
        let report = CatalogValidator::new().validate(&healthy());
        assert!(report.is_ok(), "{:?}", report.issues);
        assert_eq!(report.summary(), "OK: 1 segments, 1 products");
    }

    #[test]
    fn test_reference_problems_are_reported() {
        let mut catalog = healthy();
        catalog.segments[0].rationale_tags.push(tag(
            "bad",
            vec![comparison_ref(None), comparison_ref(Some("bogus")), spec_ref(None), spec_ref(Some("Colour"))],
        ));
        catalog.segments[0].rationale_tags.push(tag("", Vec::new()));

        let report = CatalogValidator::new().validate(&catalog);
        let segment = SegmentRef {
            manufacturer_id: ManufacturerId::SchneiderElectric,
            segment_id: "residential".to_string(),
        };
        assert_eq!(
            report.issues,
            vec![
                ValidationIssue::ComparisonRefMissingKey { segment: segment.clone(), tag_id: "bad".into() },
                ValidationIssue::UnknownComparisonKey { segment: segment.clone(), tag_id: "bad".into(), key: "bogus".into() },
                ValidationIssue::SpecificationRefMissingLabel { segment: segment.clone(), tag_id: "bad".into() },
                ValidationIssue::SpecificationLabelNotFound { segment: segment.clone(), tag_id: "bad".into(), label: "Colour".into() },
                ValidationIssue::IncompleteTag { segment: segment.clone(), tag_id: "unknown".into() },
                ValidationIssue::TagWithoutEvidence { segment: segment.clone(), tag_id: "unknown".into() },
                ValidationIssue::UnresolvedTag { segment, tag_id: "bad".into() },
            ]
        );
        assert_eq!(report.summary(), "NG: 7 issues");
    }

    #[test]
    fn test_required_keys_and_unresolved_products() {
        let mut catalog = healthy();
        catalog.segments[0].rationale_tags.remove(0);
        catalog.products[0].comparison = ComparisonRecord::default();
        catalog.products[0].specifications.clear();

        let report = CatalogValidator::new().validate(&catalog);
        let messages: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "segment=schneider-electric/residential tag=in specification label='Network type' not found on any product",
                "segment=schneider-electric/residential has no evidence for required comparison key=standardsApprovals",
                "segment=schneider-electric/residential tag=ka resolves on no product",
                "segment=schneider-electric/residential tag=in resolves on no product",
                "product=resi9 resolves no evidence refs",
            ]
        );

        // 自定义规则：不要求任何键
        let relaxed = CatalogValidator::with_rules(ValidationRules::empty()).validate(&catalog);
        assert_eq!(relaxed.issues.len(), 4);
    }

    #[test]
    fn test_variant_evidence_counts_for_product() {
        let mut catalog = healthy();
        let mut variant_product = product("c60hdc", "residential");
        variant_product.comparison = ComparisonRecord::default();
        variant_product.specifications.clear();
        variant_product.variants = vec![crate::catalog::ProductVariant {
            variant_id: "dc".to_string(),
            variant_label: "DC".to_string(),
            comparison: ComparisonRecord {
                breaking_capacity: "10kA".to_string(),
                ..ComparisonRecord::default()
            },
        }];
        catalog.products.push(variant_product);
        assert!(CatalogValidator::new().validate(&catalog).is_ok());
    }

    #[test]
    fn test_structural_problems_are_reported() {
        let mut catalog = healthy();
        catalog.manufacturers.clear();
        catalog.products.push(product("resi9", "residential"));
        catalog.products.push(product("orphan", "datacenter"));
        catalog.segments[0].product_ids = vec!["resi9".into(), "ghost".into()];
        catalog.segments.push(segment("industrial", Vec::new()));

        let report = CatalogValidator::new().validate(&catalog);
        let kinds: Vec<&ValidationIssue> = report.issues.iter().collect();

        assert!(kinds.contains(&&ValidationIssue::DuplicateProductId { product_id: "resi9".into() }));
        assert!(kinds.contains(&&ValidationIssue::UnknownProductManufacturer {
            product_id: "orphan".into(),
            manufacturer_id: ManufacturerId::SchneiderElectric,
        }));
        assert!(kinds.contains(&&ValidationIssue::UnknownProductSegment {
            product_id: "orphan".into(),
            segment: SegmentRef { manufacturer_id: ManufacturerId::SchneiderElectric, segment_id: "datacenter".into() },
        }));
        assert!(kinds.contains(&&ValidationIssue::DanglingSegmentProduct {
            segment: SegmentRef { manufacturer_id: ManufacturerId::SchneiderElectric, segment_id: "residential".into() },
            product_id: "ghost".into(),
        }));
        assert!(kinds.contains(&&ValidationIssue::EmptySegment {
            segment: SegmentRef { manufacturer_id: ManufacturerId::SchneiderElectric, segment_id: "industrial".into() },
        }));
        // 重复ID只报告一次
        assert_eq!(
            report
                .issues
                .iter()
                .filter(|issue| matches!(issue, ValidationIssue::DuplicateProductId { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_tag_resolving_on_no_product_is_reported() {
        // 测试场景：标准值为 "N/A"，该标签在细分市场内任何产品上都没有依据
        let mut catalog = healthy();
        catalog.segments.push(segment(
            "pv",
            vec![
                tag("ka", vec![comparison_ref(Some("breakingCapacity"))]),
                tag("std", vec![comparison_ref(Some("standardsApprovals"))]),
            ],
        ));
        let mut pv = product("c60pv", "pv");
        pv.comparison.standards_approvals = "N/A".to_string();
        catalog.products.push(pv);

        let report = CatalogValidator::new().validate(&catalog);
        assert_eq!(
            report.issues,
            vec![ValidationIssue::UnresolvedTag {
                segment: SegmentRef {
                    manufacturer_id: ManufacturerId::SchneiderElectric,
                    segment_id: "pv".into(),
                },
                tag_id: "std".into(),
            }]
        );
        assert_eq!(report.issues[0].to_string(), "segment=schneider-electric/pv tag=std resolves on no product");
    }

    #[test]
    fn test_tag_resolving_only_on_a_variant_passes() {
        let mut catalog = healthy();
        catalog.segments.push(segment("pv", vec![tag("ka", vec![comparison_ref(Some("breakingCapacity"))])]));
        let mut pv = product("c60pv", "pv");
        pv.comparison = ComparisonRecord::default();
        pv.variants = vec![crate::catalog::ProductVariant {
            variant_id: "dc".to_string(),
            variant_label: "DC".to_string(),
            comparison: ComparisonRecord {
                breaking_capacity: "10kA".to_string(),
                ..ComparisonRecord::default()
            },
        }];
        catalog.products.push(pv);
        assert!(CatalogValidator::new().validate(&catalog).is_ok());
    }

    #[test]
    fn test_segment_without_tags() {
        let mut catalog = healthy();
        catalog.segments[0].rationale_tags.clear();
        let report = CatalogValidator::new().validate(&catalog);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.issues[0].to_string(),
            "segment=schneider-electric/residential has no rationale tags"
        );
    }
}
