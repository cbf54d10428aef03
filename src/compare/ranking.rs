//! 对比排名引擎
//! 对每个对比行，计算选中列中取得最优值的列集合（并列全部标记，无人为裁决）

use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, BTreeSet};

use super::column::ComparisonColumn;
use super::value_parser::{RankMode, rank_rule, score};
use crate::catalog::{COMPARISON_ROWS, ComparisonRowKey};
use crate::config::RankScope;

/// 行 → 最优列ID集合；所有行都有条目，无规则或无可解析值的行为空集合
pub type BestByRow = BTreeMap<ComparisonRowKey, BTreeSet<String>>;

/// 所有行均为空集合的结果
pub fn empty_best_by_row() -> BestByRow {
    COMPARISON_ROWS
        .iter()
        .map(|row| (row.key, BTreeSet::new()))
        .collect()
}

/// 参与排名的行（按规范顺序）
pub fn ranked_rows() -> Vec<ComparisonRowKey> {
    COMPARISON_ROWS
        .iter()
        .map(|row| row.key)
        .filter(|&key| rank_rule(key).is_some())
        .collect()
}

/// 判断某列是否为某行最优
pub fn is_best(best: &BestByRow, key: ComparisonRowKey, column_id: &str) -> bool {
    best.get(&key).is_some_and(|ids| ids.contains(column_id))
}

/// 计算各行最优列集合（整个选择集内比较）
/// 重复的列ID只计一次（保留首次出现）
pub fn rank_best(columns: &[ComparisonColumn]) -> BestByRow {
    let unique = dedupe_columns(columns);
    let mut best = empty_best_by_row();

    for row in COMPARISON_ROWS {
        let winners = rank_row(row.key, &unique);
        if !winners.is_empty() {
            best.insert(row.key, winners);
        }
    }
    best
}

/// 按排名范围计算最优列集合
/// WithinProduct：按所属产品分组各自排名，结果合并
pub fn rank_best_scoped(columns: &[ComparisonColumn], scope: RankScope) -> BestByRow {
    match scope {
        RankScope::AcrossSelection => rank_best(columns),
        RankScope::WithinProduct => {
            let mut groups: Vec<(&str, Vec<ComparisonColumn>)> = Vec::new();
            for column in columns {
                match groups.iter_mut().find(|(product_id, _)| *product_id == column.product_id) {
                    Some((_, group)) => group.push(column.clone()),
                    None => groups.push((column.product_id.as_str(), vec![column.clone()])),
                }
            }

            let mut best = empty_best_by_row();
            for (_, group) in &groups {
                for (key, winners) in rank_best(group) {
                    best.entry(key).or_default().extend(winners);
                }
            }
            best
        }
    }
}

fn dedupe_columns(columns: &[ComparisonColumn]) -> Vec<&ComparisonColumn> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    columns
        .iter()
        .filter(|column| seen.insert(column.column_id.as_str()))
        .collect()
}

/// 单行排名：跳过缺失/无法解析的列，取极值后收集所有相等的列
fn rank_row(key: ComparisonRowKey, columns: &[&ComparisonColumn]) -> BTreeSet<String> {
    let Some(rule) = rank_rule(key) else {
        return BTreeSet::new();
    };

    let scored: Vec<(&str, f64)> = columns
        .iter()
        .filter_map(|column| {
            column
                .comparison
                .get(key)
                .and_then(|text| score(key, text))
                .map(|value| (column.column_id.as_str(), value))
        })
        .collect();

    let scores = scored.iter().map(|(_, value)| *value);
    let extremum = match rule.mode {
        RankMode::Higher => scores.reduce(f64::max),
        RankMode::Lower => scores.reduce(f64::min),
    };
    let Some(extremum) = extremum else {
        return BTreeSet::new();
    };

    scored
        .into_iter()
        .filter(|(_, value)| *value == extremum)
        .map(|(column_id, _)| column_id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComparisonRecord;

    fn column(id: &str, product_id: &str, comparison: ComparisonRecord) -> ComparisonColumn {
        ComparisonColumn {
            column_id: id.to_string(),
            product_id: product_id.to_string(),
            variant_id: None,
            label: id.to_string(),
            comparison,
        }
    }

    fn ids(best: &BestByRow, key: ComparisonRowKey) -> Vec<&str> {
        best[&key].iter().map(String::as_str).collect()
    }

    #[test]
    fn test_breaking_capacity_scenario() {
        let columns = vec![
            column("a", "a", ComparisonRecord { breaking_capacity: "36; 25; 16kA".into(), ..Default::default() }),
            column("b", "b", ComparisonRecord { breaking_capacity: "20kA".into(), ..Default::default() }),
        ];
        let best = rank_best(&columns);
        assert_eq!(ids(&best, ComparisonRowKey::BreakingCapacity), vec!["a"]);
    }

    #[test]
    fn test_rated_current_scenario() {
        let columns = vec![
            column("a", "a", ComparisonRecord { rated_current_in: "0.5-125A".into(), ..Default::default() }),
            column("b", "b", ComparisonRecord { rated_current_in: "16-3200A".into(), ..Default::default() }),
        ];
        let best = rank_best(&columns);
        assert_eq!(ids(&best, ComparisonRowKey::RatedCurrentIn), vec!["b"]);
    }

    #[test]
    fn test_standards_scenario() {
        let columns = vec![
            column("a", "a", ComparisonRecord { standards_approvals: "IEC 60898-1".into(), ..Default::default() }),
            column("b", "b", ComparisonRecord { standards_approvals: "IEC 60898-1, UL 489".into(), ..Default::default() }),
        ];
        let best = rank_best(&columns);
        assert_eq!(ids(&best, ComparisonRowKey::StandardsApprovals), vec!["b"]);
    }

    #[test]
    fn test_width_lower_is_better() {
        let columns = vec![
            column("a", "a", ComparisonRecord { width_per_pole: "17.5 mm".into(), ..Default::default() }),
            column("b", "b", ComparisonRecord { width_per_pole: "18 mm".into(), ..Default::default() }),
        ];
        let best = rank_best(&columns);
        assert_eq!(ids(&best, ComparisonRowKey::WidthPerPole), vec!["a"]);
    }

    #[test]
    fn test_ties_are_all_best() {
        let columns = vec![
            column("a", "a", ComparisonRecord { trip_curve_characteristics: "B, C".into(), ..Default::default() }),
            column("b", "b", ComparisonRecord { trip_curve_characteristics: "C, D".into(), ..Default::default() }),
            column("c", "c", ComparisonRecord { trip_curve_characteristics: "C".into(), ..Default::default() }),
        ];
        let best = rank_best(&columns);
        assert_eq!(ids(&best, ComparisonRowKey::TripCurveCharacteristics), vec!["a", "b"]);
    }

    #[test]
    fn test_unranked_rows_always_empty() {
        let columns = vec![column(
            "a",
            "a",
            ComparisonRecord {
                capacity_class: "Standard".into(),
                number_of_poles: "1P, 2P".into(),
                rated_voltage_ue: "230/400V".into(),
                ..Default::default()
            },
        )];
        let best = rank_best(&columns);
        assert_eq!(best.len(), COMPARISON_ROWS.len());
        for row in COMPARISON_ROWS {
            if rank_rule(row.key).is_none() {
                assert!(best[&row.key].is_empty(), "row {} must not rank", row.key);
            }
        }
    }

    #[test]
    fn test_single_column_is_best_only_where_parseable() {
        let columns = vec![column(
            "solo",
            "solo",
            ComparisonRecord {
                breaking_capacity: "6kA".into(),
                width_per_pole: "N/A".into(),
                ..Default::default()
            },
        )];
        let best = rank_best(&columns);
        assert!(is_best(&best, ComparisonRowKey::BreakingCapacity, "solo"));
        assert!(!is_best(&best, ComparisonRowKey::WidthPerPole, "solo"));
        assert!(best[&ComparisonRowKey::StandardsApprovals].is_empty());
    }

    #[test]
    fn test_empty_and_duplicate_input() {
        assert!(rank_best(&[]).values().all(BTreeSet::is_empty));

        let a = column("a", "a", ComparisonRecord { breaking_capacity: "10kA".into(), ..Default::default() });
        let b = column("b", "b", ComparisonRecord { breaking_capacity: "6kA".into(), ..Default::default() });
        let best = rank_best(&[a.clone(), a, b]);
        assert_eq!(ids(&best, ComparisonRowKey::BreakingCapacity), vec!["a"]);
    }

    #[test]
    fn test_within_product_scope_ranks_variants_in_isolation() {
        // 测试场景：同一产品的 AC/DC 变体只与彼此比较，另一产品独立为最优
        let columns = vec![
            column("p::ac", "p", ComparisonRecord { breaking_capacity: "10kA".into(), ..Default::default() }),
            column("p::dc", "p", ComparisonRecord { breaking_capacity: "6kA".into(), ..Default::default() }),
            column("q", "q", ComparisonRecord { breaking_capacity: "25kA".into(), ..Default::default() }),
        ];

        let across = rank_best_scoped(&columns, RankScope::AcrossSelection);
        assert_eq!(ids(&across, ComparisonRowKey::BreakingCapacity), vec!["q"]);

        let within = rank_best_scoped(&columns, RankScope::WithinProduct);
        assert_eq!(ids(&within, ComparisonRowKey::BreakingCapacity), vec!["p::ac", "q"]);
        assert_eq!(within.len(), COMPARISON_ROWS.len());
    }

    #[test]
    fn test_ranked_rows_list() {
        assert_eq!(
            ranked_rows(),
            vec![
                ComparisonRowKey::RatedCurrentIn,
                ComparisonRowKey::BreakingCapacity,
                ComparisonRowKey::TripCurveCharacteristics,
                ComparisonRowKey::StandardsApprovals,
                ComparisonRowKey::WidthPerPole,
            ]
        );
    }
}
