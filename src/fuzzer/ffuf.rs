//! ffuf 路径爆破封装
//! 调用 ffuf 子进程，通过 JSON 输出文件回收发现结果

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use crate::config::GlobalConfig;
use crate::error::{InterventionError, IvResult};

/// 单条内容发现记录（对应 ffuf 输出文件中的 results 条目）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    pub url: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub words: u64,
    #[serde(default)]
    pub lines: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<BTreeMap<String, String>>,
    #[serde(
        default,
        rename = "content-type",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirectlocation: Option<String>,
}

/// ffuf JSON 输出文件结构（仅关心 results 字段）
#[derive(Debug, Deserialize)]
struct FfufOutput {
    #[serde(default)]
    results: Vec<DiscoveryRecord>,
}

/// 路径爆破器
pub struct Fuzzer {
    program: PathBuf,
    timeout_secs: u64,
    threads: u32,
    match_codes: String,
}

impl Fuzzer {
    /// 根据配置构建爆破器
    pub fn new(config: &GlobalConfig) -> Self {
        Self {
            program: config.ffuf_path.clone(),
            timeout_secs: config.fuzz_timeout,
            threads: config.fuzz_threads,
            match_codes: config.match_codes.clone(),
        }
    }

    /// 对目标执行一轮字典爆破，返回原始发现记录
    pub async fn run(
        &self,
        url: &str,
        wordlist: &Path,
        tech_name: &str,
    ) -> IvResult<Vec<DiscoveryRecord>> {
        let base = Self::base_url(url)?;
        let output_file = Self::output_path(url, tech_name);

        let mut cmd = Command::new(&self.program);
        cmd.arg("-u")
            .arg(format!("{}/FUZZ", base))
            .arg("-w")
            .arg(wordlist)
            .arg("-o")
            .arg(&output_file)
            .arg("-of")
            .arg("json")
            .arg("-mc")
            .arg(&self.match_codes)
            .arg("-t")
            .arg(self.threads.to_string())
            .arg("-s")
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        // 超时丢弃子进程 future 时同步终止子进程，
        // 避免孤儿 ffuf 继续请求目标并事后写出陈旧的输出文件
        cmd.kill_on_drop(true);

        debug!("启动 ffuf：技术={}，字典={}", tech_name, wordlist.display());
        match timeout(Duration::from_secs(self.timeout_secs), cmd.output()).await {
            Ok(Ok(output)) => {
                if !output.status.success() {
                    debug!("ffuf 退出码异常：{:?}", output.status.code());
                }
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(InterventionError::ToolNotFound("ffuf".to_string()));
            }
            Ok(Err(e)) => {
                return Err(InterventionError::ToolExecError(format!(
                    "ffuf 启动失败：{}",
                    e
                )));
            }
            Err(_) => {
                warn!("路径爆破超时（{}秒）：{}", self.timeout_secs, tech_name);
                let _ = tokio::fs::remove_file(&output_file).await;
                return Ok(Vec::new());
            }
        }

        self.collect_results(&output_file).await
    }

    /// 读取并删除 ffuf 输出文件；文件缺失视为无结果
    async fn collect_results(&self, output_file: &Path) -> IvResult<Vec<DiscoveryRecord>> {
        let bytes = match tokio::fs::read(output_file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let _ = tokio::fs::remove_file(output_file).await;

        match serde_json::from_slice::<FfufOutput>(&bytes) {
            Ok(parsed) => Ok(parsed.results),
            Err(e) => {
                warn!("ffuf 输出文件解析失败：{}", e);
                Ok(Vec::new())
            }
        }
    }

    /// 将目标 URL 约减为 scheme://host[:port]
    pub(crate) fn base_url(url: &str) -> IvResult<String> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| InterventionError::InvalidInput(format!("URL 缺少主机名：{}", url)))?;

        Ok(match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        })
    }

    /// ffuf 输出文件落在系统临时目录，文件名带 URL 哈希避免互相覆盖
    fn output_path(url: &str, tech_name: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        std::env::temp_dir().join(format!("ffuf_{}_{:x}.json", tech_name, hasher.finish()))
    }
}
