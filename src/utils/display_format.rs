//! 对比表显示格式化
//! 仅负责文本换行布局，不改变数值内容

use once_cell::sync::Lazy;
use regex::Regex;

static SEMICOLON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*;\s*").expect("Invalid semicolon regex"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// 分断能力：每个分号分隔的数值独占一行
pub fn format_breaking_capacity_value(value: &str) -> String {
    SEMICOLON_RE.replace_all(value, "\n").into_owned()
}

/// 标准与认证：分号视为逗号，空白折叠
/// 两项时各占一行；更多项时在 ceil(n/2) 处折为两行
pub fn format_standards_value(value: &str) -> String {
    let separated = SEMICOLON_RE.replace_all(value, ", ");
    let normalized = WHITESPACE_RE.replace_all(&separated, " ").trim().to_string();

    let parts: Vec<&str> = normalized
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    match parts.len() {
        0 | 1 => normalized.clone(),
        2 => format!("{}\n{}", parts[0], parts[1]),
        len => {
            let midpoint = len.div_ceil(2);
            format!("{}\n{}", parts[..midpoint].join(", "), parts[midpoint..].join(", "))
        }
    }
}
