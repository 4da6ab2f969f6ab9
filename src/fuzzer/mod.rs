//! 路径爆破模块：封装外部内容发现工具调用

pub mod ffuf;

pub use ffuf::{DiscoveryRecord, Fuzzer};
