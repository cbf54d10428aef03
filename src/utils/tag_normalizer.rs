//! 标签规范化工具
//! 将细分市场依据标签的原始文本拆分、去重、排序为摘要标签列表
//! 流程：拆分 → 去重（含被包含标签抑制）→ 稳定排序

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

/// 以 "Curve" 开头的标签保持原子性
static CURVE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Curve\s+").expect("Invalid curve prefix regex"));
static COMMA_SPACING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("Invalid comma spacing regex"));
static STANDARD_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:UL|IEC|EN|CSA|CCC)").expect("Invalid standard prefix regex"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));
static HYPHEN_SPACING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*").expect("Invalid hyphen spacing regex"));

// 分类正则
static STANDARD_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:IEC|EN|UL|CSA|CCC)(?:\b|\d)|(?i:standard)").expect("Invalid standard tag regex")
});
static CURRENT_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^0-9])\d+(?:\.\d+)?-\d+(?:\.\d+)?A\b|rated current|current")
        .expect("Invalid current tag regex")
});
static BREAKING_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)kA|breaking|icu|icn").expect("Invalid breaking tag regex"));
static CURVE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)curve").expect("Invalid curve tag regex"));

// 标准子排序
static STANDARD_ORDER: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^IEC(?:\b|\d)",
        r"(?i)^EN(?:\b|\d)",
        r"(?i)^UL(?:\b|\d)",
        r"(?i)^CSA(?:\b|\d)",
        r"(?i)^CCC(?:\b|\d)",
        r"(?i)standard",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid standard order regex"))
    .collect()
});
const STANDARD_OTHER_RANK: usize = 9;

/// 拆分单个原始标签
/// - "Curve ..." 前缀：不拆分，仅规范逗号间距
/// - 其余：按 ',' 再按 '+' 拆分并去空白；以标准前缀开头且含 " / " 的片段再按 " / " 拆分
pub fn split_summary_tag(tag: &str) -> Vec<String> {
    let trimmed = tag.trim();
    if CURVE_PREFIX_RE.is_match(trimmed) {
        return vec![COMMA_SPACING_RE.replace_all(trimmed, ", ").into_owned()];
    }

    trimmed
        .split(',')
        .flat_map(|part| part.split('+'))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .flat_map(|part| {
            if part.contains(" / ") && STANDARD_PREFIX_RE.is_match(part) {
                part.split(" / ")
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            } else {
                vec![part.to_string()]
            }
        })
        .collect()
}

/// 去重键：小写、空白折叠、连字符两侧去空白
pub fn normalize_tag_key(tag: &str) -> String {
    let lowered = tag.to_lowercase();
    let collapsed = WHITESPACE_RE.replace_all(&lowered, " ");
    HYPHEN_SPACING_RE.replace_all(&collapsed, "-").trim().to_string()
}

/// 去重
/// 同键保留首次出现的写法；键被另一个更长的保留键严格包含的标签被抑制
pub fn dedupe_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: Vec<(String, String)> = Vec::new();
    for tag in tags {
        let spelling = tag.as_ref().trim();
        if spelling.is_empty() {
            continue;
        }
        let key = normalize_tag_key(spelling);
        if !unique.iter().any(|(existing, _)| *existing == key) {
            unique.push((key, spelling.to_string()));
        }
    }

    unique
        .iter()
        .filter(|(key, _)| {
            !unique
                .iter()
                .any(|(other, _)| other.len() > key.len() && other.contains(key.as_str()))
        })
        .map(|(_, spelling)| spelling.clone())
        .collect()
}

/// 类别排名：标准 0、额定电流 1、分断能力 2、脱扣曲线 3、其他 4
fn category_rank(tag: &str) -> usize {
    if STANDARD_TAG_RE.is_match(tag) {
        0
    } else if CURRENT_TAG_RE.is_match(tag) {
        1
    } else if BREAKING_TAG_RE.is_match(tag) {
        2
    } else if CURVE_TAG_RE.is_match(tag) {
        3
    } else {
        4
    }
}

fn standard_rank(tag: &str) -> usize {
    STANDARD_ORDER
        .iter()
        .position(|re| re.is_match(tag))
        .unwrap_or(STANDARD_OTHER_RANK)
}

/// 标签排序比较：类别 → 标准子排序 → 忽略大小写的字典序 → 字节序
pub fn compare_tag_label(a: &str, b: &str) -> Ordering {
    let (rank_a, rank_b) = (category_rank(a), category_rank(b));
    rank_a
        .cmp(&rank_b)
        .then_with(|| {
            if rank_a == 0 {
                standard_rank(a).cmp(&standard_rank(b))
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// 稳定排序
pub fn sort_tags(mut tags: Vec<String>) -> Vec<String> {
    tags.sort_by(|a, b| compare_tag_label(a, b));
    tags
}

/// 原始标签 → 摘要标签
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let split: Vec<String> = raw
        .into_iter()
        .flat_map(|tag| split_summary_tag(tag.as_ref()))
        .collect();
    sort_tags(dedupe_tags(split))
}
