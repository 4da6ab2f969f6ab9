//! 技术探测模块：封装外部扫描器调用

pub mod nuclei;

pub use nuclei::TechScanner;
