//! 工具模块：标签规范化、显示格式化
pub mod tag_normalizer;
pub mod display_format;

pub use self::tag_normalizer::{
    compare_tag_label, dedupe_tags, normalize_tag_key, normalize_tags, sort_tags, split_summary_tag,
};
pub use self::display_format::{format_breaking_capacity_value, format_standards_value};
