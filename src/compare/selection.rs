//! 对比选择状态
//! 有上限、去重的产品ID列表；作为显式值传入纯函数，不使用全局可变单例

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStore, ManufacturerId, Product};
use crate::config::MAX_COMPARE_PRODUCTS;

/// 解析逗号分隔的ID列表（去空白、丢弃空项）
pub fn parse_ids(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// 对比选择
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareSelection {
    product_ids: Vec<String>,
    max: usize,
}

impl Default for CompareSelection {
    fn default() -> Self {
        Self::with_capacity(MAX_COMPARE_PRODUCTS)
    }
}

impl CompareSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定上限（至少为 1）
    pub fn with_capacity(max: usize) -> Self {
        Self {
            product_ids: Vec::new(),
            max: max.max(1),
        }
    }

    pub fn product_ids(&self) -> &[String] {
        &self.product_ids
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.product_ids.len() >= self.max
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|id| id == product_id)
    }

    /// 添加产品；已存在或已满时不变，返回是否发生变化
    pub fn add(&mut self, product_id: impl Into<String>) -> bool {
        let product_id = product_id.into();
        if product_id.trim().is_empty() || self.contains(&product_id) || self.is_full() {
            return false;
        }
        self.product_ids.push(product_id);
        true
    }

    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.product_ids.len();
        self.product_ids.retain(|id| id != product_id);
        before != self.product_ids.len()
    }

    pub fn clear(&mut self) {
        self.product_ids.clear();
    }

    /// 整体替换：丢弃目录中不存在的ID，去重，截断到上限
    pub fn replace<I, S>(&mut self, product_ids: I, store: &CatalogStore)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_ids.clear();
        for product_id in product_ids {
            let product_id = product_id.into();
            if store.product_by_id(&product_id).is_some() {
                self.add(product_id);
            }
        }
    }

    /// 解析为产品列表；过期ID静默跳过
    pub fn resolve<'a>(&self, store: &'a CatalogStore) -> Vec<&'a Product> {
        self.product_ids
            .iter()
            .filter_map(|id| store.product_by_id(id))
            .take(self.max)
            .collect()
    }

    /// 首个有效产品所属厂商
    pub fn primary_manufacturer(&self, store: &CatalogStore) -> Option<ManufacturerId> {
        self.resolve(store).first().map(|product| product.manufacturer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ComparisonRecord};

    fn store() -> CatalogStore {
        let products = ["resi9", "easy9", "ic60n"]
            .iter()
            .map(|id| Product {
                id: id.to_string(),
                manufacturer_id: ManufacturerId::SchneiderElectric,
                segment_id: "residential".to_string(),
                series: id.to_string(),
                comparison: ComparisonRecord::default(),
                variants: Vec::new(),
                specifications: Vec::new(),
            })
            .collect();
        CatalogStore::new(Catalog {
            products,
            ..Catalog::default()
        })
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids(" a, ,b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_ids("").is_empty());
    }

    #[test]
    fn test_add_rejects_duplicates_and_overflow() {
        let mut selection = CompareSelection::with_capacity(2);
        assert!(selection.add("a"));
        assert!(!selection.add("a"));
        assert!(selection.add("b"));
        assert!(selection.is_full());
        assert!(!selection.add("c"));
        assert_eq!(selection.product_ids(), ["a", "b"]);
        assert!(selection.remove("a"));
        assert!(!selection.remove("a"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_replace_and_resolve_skip_stale_ids() {
        let store = store();
        let mut selection = CompareSelection::with_capacity(2);
        selection.replace(["ghost", "easy9", "easy9", "resi9", "ic60n"], &store);
        assert_eq!(selection.product_ids(), ["easy9", "resi9"]);

        let mut stale = CompareSelection::new();
        stale.add("ghost");
        stale.add("ic60n");
        let resolved: Vec<&str> = stale.resolve(&store).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(resolved, vec!["ic60n"]);
        assert_eq!(stale.primary_manufacturer(&store), Some(ManufacturerId::SchneiderElectric));
    }
}
