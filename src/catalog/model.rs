//! 目录数据模型定义
//! 仅存储目录数据（厂商/细分市场/产品/依据标签），无任何业务逻辑，支持序列化/反序列化
//! 所有实体在加载后只读，运行期不创建、不修改、不销毁

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::McbError;

/// "不适用"哨兵值，与缺失/空白同等对待
pub const NOT_APPLICABLE: &str = "N/A";

/// 判断字段文本是否视为缺失（空白或 "N/A"）
#[inline]
pub fn is_absent(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_APPLICABLE)
}

/// 厂商标识（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManufacturerId {
    SchneiderElectric,
    Abb,
    Siemens,
    Eaton,
    LsElectric,
}

impl ManufacturerId {
    pub const ALL: [ManufacturerId; 5] = [
        ManufacturerId::SchneiderElectric,
        ManufacturerId::Abb,
        ManufacturerId::Siemens,
        ManufacturerId::Eaton,
        ManufacturerId::LsElectric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManufacturerId::SchneiderElectric => "schneider-electric",
            ManufacturerId::Abb => "abb",
            ManufacturerId::Siemens => "siemens",
            ManufacturerId::Eaton => "eaton",
            ManufacturerId::LsElectric => "ls-electric",
        }
    }
}

impl fmt::Display for ManufacturerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManufacturerId {
    type Err = McbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| McbError::UnknownManufacturer(wanted.to_string()))
    }
}

/// 厂商信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manufacturer {
    pub id: ManufacturerId,
    pub name: String,
    #[serde(default, alias = "logoRef")]
    pub logo_url: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub status_label: String,
}

/// 对比行键（固定的对比表结构）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonRowKey {
    CapacityClass,
    RatedCurrentIn,
    BreakingCapacity,
    TripCurveCharacteristics,
    NumberOfPoles,
    RatedVoltageUe,
    RatedInsulationVoltageUi,
    StandardsApprovals,
    MechanicalEndurance,
    ElectricalEndurance,
    WidthPerPole,
    ServiceBreakingCapacityIcs,
}

impl ComparisonRowKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonRowKey::CapacityClass => "capacityClass",
            ComparisonRowKey::RatedCurrentIn => "ratedCurrentIn",
            ComparisonRowKey::BreakingCapacity => "breakingCapacity",
            ComparisonRowKey::TripCurveCharacteristics => "tripCurveCharacteristics",
            ComparisonRowKey::NumberOfPoles => "numberOfPoles",
            ComparisonRowKey::RatedVoltageUe => "ratedVoltageUe",
            ComparisonRowKey::RatedInsulationVoltageUi => "ratedInsulationVoltageUi",
            ComparisonRowKey::StandardsApprovals => "standardsApprovals",
            ComparisonRowKey::MechanicalEndurance => "mechanicalEndurance",
            ComparisonRowKey::ElectricalEndurance => "electricalEndurance",
            ComparisonRowKey::WidthPerPole => "widthPerPole",
            ComparisonRowKey::ServiceBreakingCapacityIcs => "serviceBreakingCapacityIcs",
        }
    }

    /// 行的规范显示名（取自 COMPARISON_ROWS）
    pub fn label(&self) -> &'static str {
        COMPARISON_ROWS
            .iter()
            .find(|row| row.key == *self)
            .map(|row| row.label)
            .unwrap_or_else(|| self.as_str())
    }
}

impl fmt::Display for ComparisonRowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonRowKey {
    type Err = McbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        COMPARISON_ROWS
            .iter()
            .map(|row| row.key)
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| McbError::InvalidInput(format!("unknown comparison key '{}'", wanted)))
    }
}

/// 对比行定义：(键, 显示名)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub key: ComparisonRowKey,
    pub label: &'static str,
}

/// 规范对比行列表，所有产品对比表共用的列结构（顺序即显示顺序）
pub const COMPARISON_ROWS: [ComparisonRow; 12] = [
    ComparisonRow { key: ComparisonRowKey::CapacityClass, label: "Capacity Class" },
    ComparisonRow { key: ComparisonRowKey::RatedCurrentIn, label: "Rated Current (In)" },
    ComparisonRow { key: ComparisonRowKey::BreakingCapacity, label: "Breaking Capacity (Icu / Icn)" },
    ComparisonRow { key: ComparisonRowKey::TripCurveCharacteristics, label: "Trip Curve Characteristics" },
    ComparisonRow { key: ComparisonRowKey::NumberOfPoles, label: "Number of Poles" },
    ComparisonRow { key: ComparisonRowKey::RatedVoltageUe, label: "Rated Voltage (Ue)" },
    ComparisonRow { key: ComparisonRowKey::RatedInsulationVoltageUi, label: "Rated Insulation Voltage (Ui)" },
    ComparisonRow { key: ComparisonRowKey::StandardsApprovals, label: "Standards / Approvals" },
    ComparisonRow { key: ComparisonRowKey::MechanicalEndurance, label: "Mechanical Endurance" },
    ComparisonRow { key: ComparisonRowKey::ElectricalEndurance, label: "Electrical Endurance" },
    ComparisonRow { key: ComparisonRowKey::WidthPerPole, label: "Width per Pole" },
    ComparisonRow { key: ComparisonRowKey::ServiceBreakingCapacityIcs, label: "Service Breaking Capacity (Ics)" },
];

/// 产品对比记录（固定结构）
/// 空字符串表示缺失；耐久次数两项在部分目录版本中不存在，显式建模为 Option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    #[serde(default)]
    pub capacity_class: String,
    #[serde(default)]
    pub rated_current_in: String,
    #[serde(default)]
    pub breaking_capacity: String,
    #[serde(default)]
    pub trip_curve_characteristics: String,
    #[serde(default)]
    pub number_of_poles: String,
    #[serde(default)]
    pub rated_voltage_ue: String,
    #[serde(default)]
    pub rated_insulation_voltage_ui: String,
    #[serde(default)]
    pub standards_approvals: String,
    #[serde(default)]
    pub mechanical_endurance: Option<String>,
    #[serde(default)]
    pub electrical_endurance: Option<String>,
    #[serde(default)]
    pub width_per_pole: String,
    #[serde(default)]
    pub service_breaking_capacity_ics: String,
}

impl ComparisonRecord {
    /// 原始字段文本（不做缺失判断）
    pub fn raw(&self, key: ComparisonRowKey) -> Option<&str> {
        match key {
            ComparisonRowKey::CapacityClass => Some(&self.capacity_class),
            ComparisonRowKey::RatedCurrentIn => Some(&self.rated_current_in),
            ComparisonRowKey::BreakingCapacity => Some(&self.breaking_capacity),
            ComparisonRowKey::TripCurveCharacteristics => Some(&self.trip_curve_characteristics),
            ComparisonRowKey::NumberOfPoles => Some(&self.number_of_poles),
            ComparisonRowKey::RatedVoltageUe => Some(&self.rated_voltage_ue),
            ComparisonRowKey::RatedInsulationVoltageUi => Some(&self.rated_insulation_voltage_ui),
            ComparisonRowKey::StandardsApprovals => Some(&self.standards_approvals),
            ComparisonRowKey::MechanicalEndurance => self.mechanical_endurance.as_deref(),
            ComparisonRowKey::ElectricalEndurance => self.electrical_endurance.as_deref(),
            ComparisonRowKey::WidthPerPole => Some(&self.width_per_pole),
            ComparisonRowKey::ServiceBreakingCapacityIcs => Some(&self.service_breaking_capacity_ics),
        }
    }

    /// 有效字段文本：缺失、空白、"N/A" 均返回 None
    pub fn get(&self, key: ComparisonRowKey) -> Option<&str> {
        self.raw(key).filter(|text| !is_absent(text))
    }
}

/// 产品规格条目（半结构化 label/value 对）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub label: String,
    #[serde(default)]
    pub value: String,
}

/// 产品变体（如同系列的 AC / DC 分断能力版本），各自独立参与对比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub variant_id: String,
    #[serde(default)]
    pub variant_label: String,
    #[serde(default)]
    pub comparison: ComparisonRecord,
}

/// 产品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub manufacturer_id: ManufacturerId,
    pub segment_id: String,
    pub series: String,
    #[serde(default)]
    pub comparison: ComparisonRecord,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub specifications: Vec<Specification>,
}

impl Product {
    /// 按标签查找规格（首个匹配）
    pub fn specification(&self, label: &str) -> Option<&Specification> {
        self.specifications.iter().find(|spec| spec.label == label)
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }
}

/// 依据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceSource {
    Comparison,
    Specification,
}

/// 依据引用：指向对比字段或规格字段
/// key 保留原始文本，未知键由校验器报告、由解析器静默丢弃
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    pub source: EvidenceSource,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, alias = "noteJa")]
    pub note: Option<String>,
}

impl EvidenceRef {
    /// 解析对比键（未知键返回 None）
    pub fn comparison_key(&self) -> Option<ComparisonRowKey> {
        self.key.as_deref().and_then(|key| key.parse().ok())
    }
}

/// 细分市场依据标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RationaleTag {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, alias = "reasonJa")]
    pub reason: String,
    #[serde(default)]
    pub evidence_refs: Vec<EvidenceRef>,
}

/// 细分市场（如住宅、工业），作用域为厂商
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub manufacturer_id: ManufacturerId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub rationale_tags: Vec<RationaleTag>,
}

/// 完整目录（只读静态数据集）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub manufacturers: Vec<Manufacturer>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub products: Vec<Product>,
}
