//! 对比列
//! 一个产品为一列；有变体的产品按变体展开为多列，每列拥有独立的对比记录

use serde::Serialize;

use crate::catalog::{ComparisonRecord, Product};

/// 产品ID与变体ID的复合列ID分隔符
pub const COLUMN_ID_SEPARATOR: &str = "::";

/// 对比列
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonColumn {
    pub column_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    /// 列标题：系列名，变体列附带变体名
    pub label: String,
    pub comparison: ComparisonRecord,
}

impl ComparisonColumn {
    /// 无变体产品的单列
    pub fn from_product(product: &Product) -> Self {
        Self {
            column_id: product.id.clone(),
            product_id: product.id.clone(),
            variant_id: None,
            label: product.series.clone(),
            comparison: product.comparison.clone(),
        }
    }
}

/// 变体列ID
pub fn variant_column_id(product_id: &str, variant_id: &str) -> String {
    format!("{}{}{}", product_id, COLUMN_ID_SEPARATOR, variant_id)
}

/// 将产品展开为对比列（保持输入顺序）
pub fn expand_product(product: &Product) -> Vec<ComparisonColumn> {
    if !product.has_variants() {
        return vec![ComparisonColumn::from_product(product)];
    }

    product
        .variants
        .iter()
        .map(|variant| {
            let label = if variant.variant_label.trim().is_empty() {
                format!("{} ({})", product.series, variant.variant_id)
            } else {
                format!("{} ({})", product.series, variant.variant_label.trim())
            };
            ComparisonColumn {
                column_id: variant_column_id(&product.id, &variant.variant_id),
                product_id: product.id.clone(),
                variant_id: Some(variant.variant_id.clone()),
                label,
                comparison: variant.comparison.clone(),
            }
        })
        .collect()
}

pub fn expand_columns<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<ComparisonColumn> {
    products.into_iter().flat_map(expand_product).collect()
}
