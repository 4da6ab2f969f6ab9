//! 字典模块：字典目录扫描、技术名归一化与匹配查找

pub mod catalog;
pub mod normalizer;

pub use catalog::{DictMode, WordlistCatalog, WordlistVariants};
pub use normalizer::TechNameNormalizer;
