//! 对比模块：规格值解析、对比列展开、最优值排名、选择状态
pub mod value_parser;
pub mod column;
pub mod ranking;
pub mod selection;

// 导出核心接口
pub use self::value_parser::{RankMode, RankRule, rank_rule, score};
pub use self::column::{ComparisonColumn, expand_columns, expand_product, variant_column_id};
pub use self::ranking::{BestByRow, empty_best_by_row, is_best, rank_best, rank_best_scoped, ranked_rows};
pub use self::selection::{CompareSelection, parse_ids};
