//! 校验模块：目录引用完整性检查
pub mod catalog_validator;

pub use self::catalog_validator::{
    CatalogValidator, SegmentRef, ValidationIssue, ValidationReport, ValidationRules,
};
