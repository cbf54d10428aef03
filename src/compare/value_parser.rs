//! 规格值解析模块
//! 负责从自由文本规格值中提取可比较的数值分数，规则按对比行区分
//! 文本不符合该行的预期格式时返回 None（不是 0，也不是错误），该列不参与排名

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::catalog::{ComparisonRowKey, is_absent};

/// 分断能力：一组共享同一 kA 单位的数值，如 "36; 25; 16kA"、"6, 10, 15kA"、"10kA"
static KA_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)((?:\d+(?:\.\d+)?\s*[;,/]\s*)*\d+(?:\.\d+)?)\s*kA").expect("valid kA regex")
});

/// 数值
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));

/// 极宽：首个 "<数值> mm"
static MM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*mm").expect("valid mm regex"));

/// 额定电流区间："0.5-125A"、"6A - 63A"
static CURRENT_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*A?\s*[-–~]\s*(\d+(?:\.\d+)?)\s*A\b").expect("valid current range regex")
});

/// 额定电流单值："63A"
static CURRENT_SINGLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*A\b").expect("valid current regex"));

/// 脱扣曲线：独立单字母 B/C/D/K/Z
static CURVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b([BCDKZ])\b").expect("valid curve regex"));

/// 排名方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMode {
    Higher,
    Lower,
}

/// 行排名规则
#[derive(Debug, Clone, Copy)]
pub struct RankRule {
    pub mode: RankMode,
    pub score: fn(&str) -> Option<f64>,
}

/// 行对应的排名规则；无规则的行永远不参与排名
pub fn rank_rule(key: ComparisonRowKey) -> Option<RankRule> {
    let rule = match key {
        ComparisonRowKey::BreakingCapacity => RankRule {
            mode: RankMode::Higher,
            score: score_breaking_capacity,
        },
        ComparisonRowKey::WidthPerPole => RankRule {
            mode: RankMode::Lower,
            score: score_width_per_pole,
        },
        ComparisonRowKey::RatedCurrentIn => RankRule {
            mode: RankMode::Higher,
            score: score_rated_current,
        },
        ComparisonRowKey::TripCurveCharacteristics => RankRule {
            mode: RankMode::Higher,
            score: score_trip_curves,
        },
        ComparisonRowKey::StandardsApprovals => RankRule {
            mode: RankMode::Higher,
            score: score_standards,
        },
        _ => return None,
    };
    Some(rule)
}

/// 按行规则计算分数；缺失文本、无规则、无法解析均返回 None
pub fn score(key: ComparisonRowKey, text: &str) -> Option<f64> {
    if is_absent(text) {
        return None;
    }
    rank_rule(key)
        .and_then(|rule| (rule.score)(text))
        .filter(|value| value.is_finite())
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

/// 所有 kA 数值中的最大值
pub fn score_breaking_capacity(text: &str) -> Option<f64> {
    KA_RUN_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|run| NUMBER_RE.find_iter(run.as_str()))
        .filter_map(|number| parse_number(number.as_str()))
        .reduce(f64::max)
}

/// 首个 mm 数值（越小越好）
pub fn score_width_per_pole(text: &str) -> Option<f64> {
    MM_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|number| parse_number(number.as_str()))
}

/// 区间取上限，否则取单值
pub fn score_rated_current(text: &str) -> Option<f64> {
    if let Some(caps) = CURRENT_RANGE_RE.captures(text) {
        return caps.get(2).and_then(|max| parse_number(max.as_str()));
    }
    CURRENT_SINGLE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|number| parse_number(number.as_str()))
}

/// 不同曲线类型的数量
pub fn score_trip_curves(text: &str) -> Option<f64> {
    let curves: FxHashSet<char> = CURVE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|letter| letter.as_str().chars().next())
        .map(|letter| letter.to_ascii_uppercase())
        .collect();
    (!curves.is_empty()).then_some(curves.len() as f64)
}

/// 不同标准/认证条目的数量
pub fn score_standards(text: &str) -> Option<f64> {
    let tokens: FxHashSet<String> = text
        .split([',', '+', '/', ';', '|'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_uppercase)
        .collect();
    (!tokens.is_empty()).then_some(tokens.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaking_capacity_takes_max_of_shared_unit_run() {
        assert_eq!(score_breaking_capacity("36; 25; 16kA"), Some(36.0));
        assert_eq!(score_breaking_capacity("6, 10, 15kA"), Some(15.0));
        assert_eq!(score_breaking_capacity("Icn 6kA / Icu 10 KA (230V)"), Some(10.0));
        assert_eq!(score_breaking_capacity("20kA"), Some(20.0));
    }

    #[test]
    fn test_breaking_capacity_ignores_unrelated_numbers() {
        // 测试场景：电压数值不属于 kA 数值串
        assert_eq!(score_breaking_capacity("400V 10kA"), Some(10.0));
        assert_eq!(score_breaking_capacity("6000A"), None);
    }

    #[test]
    fn test_width_per_pole_first_match() {
        assert_eq!(score_width_per_pole("17.5 mm"), Some(17.5));
        assert_eq!(score_width_per_pole("18mm (1P), 36mm (2P)"), Some(18.0));
        assert_eq!(score_width_per_pole("1 module"), None);
    }

    #[test]
    fn test_rated_current_range_uses_ceiling() {
        assert_eq!(score_rated_current("0.5-125A"), Some(125.0));
        assert_eq!(score_rated_current("16-3200A"), Some(3200.0));
        assert_eq!(score_rated_current("6A - 63A"), Some(63.0));
        assert_eq!(score_rated_current("1, 2, 3, 6, 10, 16, 20, 25, 32, 40, 50, 63A"), Some(63.0));
        assert_eq!(score_rated_current("10kA"), None);
        assert_eq!(score_rated_current("see catalogue"), None);
    }

    #[test]
    fn test_trip_curves_distinct_whole_words() {
        assert_eq!(score_trip_curves("B, C, D"), Some(3.0));
        assert_eq!(score_trip_curves("Curve C / c / K"), Some(2.0));
        assert_eq!(score_trip_curves("Curves: none"), None);
    }

    #[test]
    fn test_standards_distinct_tokens() {
        assert_eq!(score_standards("IEC 60898-1"), Some(1.0));
        assert_eq!(score_standards("IEC 60898-1, UL 489"), Some(2.0));
        assert_eq!(score_standards("IEC 60947-2 + iec 60947-2; EN 60898 | CCC"), Some(3.0));
    }

    #[test]
    fn test_score_skips_absent_and_unranked() {
        // 测试场景："N/A" 不能被当作两个标准条目
        assert_eq!(score(ComparisonRowKey::StandardsApprovals, "N/A"), None);
        assert_eq!(score(ComparisonRowKey::StandardsApprovals, "  "), None);
        assert_eq!(score(ComparisonRowKey::NumberOfPoles, "1P, 2P, 3P, 4P"), None);
        assert!(rank_rule(ComparisonRowKey::CapacityClass).is_none());
        assert_eq!(score(ComparisonRowKey::WidthPerPole, "18 mm"), Some(18.0));
    }
}
