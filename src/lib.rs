//! intervention - 基于技术指纹的智能路径爆破编排工具

// 导出全局错误类型
pub use self::error::{InterventionError, IvResult};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, GlobalConfig};

// 导出字典模块核心接口
pub use self::wordlist::{DictMode, TechNameNormalizer, WordlistCatalog, WordlistVariants};

// 导出外部工具封装
pub use self::scanner::TechScanner;
pub use self::fuzzer::{DiscoveryRecord, Fuzzer};

// 导出分析与输出接口
pub use self::analysis::{InterestingHit, OccurrenceFilter};
pub use self::report::{ReportWriter, UrlReport};

// 导出编排核心与仓库预备
pub use self::engine::Intervention;
pub use self::provision::RepoProvisioner;

// 声明所有子模块
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzer;
pub mod provision;
pub mod report;
pub mod scanner;
pub mod wordlist;
