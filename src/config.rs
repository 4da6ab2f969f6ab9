//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;

use crate::wordlist::DictMode;

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 字典目录路径（OneListForAll）
    pub dict_path: PathBuf,
    // nuclei 模板目录路径
    pub templates_path: PathBuf,
    // nuclei 可执行文件路径（默认依赖 PATH 查找）
    pub nuclei_path: PathBuf,
    // ffuf 可执行文件路径（默认依赖 PATH 查找）
    pub ffuf_path: PathBuf,
    // 字典模式（短字典/长字典）
    pub mode: DictMode,
    // 判定"有趣"结果的最大长度频次
    pub occurrence: usize,
    // 技术探测超时（单位：秒）
    pub scan_timeout: u64,
    // 路径爆破超时（单位：秒）
    pub fuzz_timeout: u64,
    // ffuf 并发线程数
    pub fuzz_threads: u32,
    // ffuf 保留的响应状态码
    pub match_codes: String,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dict_path: PathBuf::from("OneListForAll/dict"),
            templates_path: PathBuf::from("nuclei-templates"),
            nuclei_path: PathBuf::from("nuclei"),
            ffuf_path: PathBuf::from("ffuf"),
            mode: DictMode::Long,
            occurrence: 10,
            scan_timeout: 300,
            fuzz_timeout: 3600,
            fuzz_threads: 50,
            match_codes: "200,201,202,204,301,302,307,401,403".to_string(),
            verbose: false,
        }
    }
}

/// 配置管理器（单例）
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn dict_path(mut self, path: PathBuf) -> Self {
        self.config.dict_path = path;
        self
    }

    pub fn templates_path(mut self, path: PathBuf) -> Self {
        self.config.templates_path = path;
        self
    }

    pub fn nuclei_path(mut self, path: PathBuf) -> Self {
        self.config.nuclei_path = path;
        self
    }

    pub fn ffuf_path(mut self, path: PathBuf) -> Self {
        self.config.ffuf_path = path;
        self
    }

    pub fn mode(mut self, mode: DictMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn occurrence(mut self, occurrence: usize) -> Self {
        self.config.occurrence = occurrence;
        self
    }

    pub fn scan_timeout(mut self, timeout: u64) -> Self {
        self.config.scan_timeout = timeout;
        self
    }

    pub fn fuzz_timeout(mut self, timeout: u64) -> Self {
        self.config.fuzz_timeout = timeout;
        self
    }

    pub fn fuzz_threads(mut self, threads: u32) -> Self {
        self.config.fuzz_threads = threads;
        self
    }

    pub fn match_codes(mut self, codes: String) -> Self {
        self.config.match_codes = codes;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
