//! nuclei 技术探测封装
//! 调用 nuclei 子进程并解析其 JSONL 输出，探测逻辑全部委托给外部工具

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::GlobalConfig;
use crate::error::{InterventionError, IvResult};
use crate::wordlist::TechNameNormalizer;

/// 技术探测器
pub struct TechScanner {
    program: PathBuf,
    templates: Vec<PathBuf>,
    timeout_secs: u64,
}

impl TechScanner {
    /// 根据配置构建探测器（仅保留磁盘上实际存在的模板）
    pub fn new(config: &GlobalConfig) -> Self {
        let candidates = [
            config.templates_path.join("http/technologies/tech-detect.yaml"),
            config.templates_path.join("http/technologies/favicon-detect.yaml"),
        ];

        let templates: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| path.exists())
            .collect();
        for tpl in &templates {
            debug!("nuclei 模板已就绪：{}", tpl.display());
        }

        Self {
            program: config.nuclei_path.clone(),
            templates,
            timeout_secs: config.scan_timeout,
        }
    }

    /// 探测目标 URL 使用的技术，返回归一化后的技术名集合
    pub async fn detect(&self, url: &str) -> IvResult<BTreeSet<String>> {
        if self.templates.is_empty() {
            warn!("未找到任何 nuclei 模板，跳过 {} 的技术探测", url);
            return Ok(BTreeSet::new());
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg("-u").arg(url);
        for tpl in &self.templates {
            cmd.arg("-t").arg(tpl);
        }
        cmd.arg("-j").stdout(Stdio::piped()).stderr(Stdio::piped());
        // 超时丢弃子进程 future 时同步终止子进程，避免孤儿进程继续扫描
        cmd.kill_on_drop(true);

        debug!("开始技术探测：{}", url);
        let output = match timeout(Duration::from_secs(self.timeout_secs), cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(InterventionError::ToolNotFound(
                    "nuclei（安装指引：https://github.com/projectdiscovery/nuclei#installation）"
                        .to_string(),
                ));
            }
            Ok(Err(e)) => {
                return Err(InterventionError::ToolExecError(format!(
                    "nuclei 启动失败：{}",
                    e
                )));
            }
            Err(_) => {
                warn!("技术探测超时（{}秒）：{}", self.timeout_secs, url);
                return Ok(BTreeSet::new());
            }
        };

        // 无结果时 nuclei 也可能返回非零退出码，stdout 仍按正常流程解析
        if !output.status.success() {
            warn!("nuclei 退出码异常：{:?}", output.status.code());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let detected = Self::parse_output(&stdout);
        debug!("技术探测完成：{}，共 {} 项", url, detected.len());
        Ok(detected)
    }

    /// 解析 nuclei 的 JSONL 输出，提取技术名
    /// 字段优先级：matcher-name > info.name > info.tags[0]
    pub(crate) fn parse_output(stdout: &str) -> BTreeSet<String> {
        let mut detected = BTreeSet::new();

        for line in stdout.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(record) = serde_json::from_str::<Value>(line) else {
                debug!("忽略非 JSON 输出行：{}", line.chars().take(50).collect::<String>());
                continue;
            };

            let tech_name = record
                .get("matcher-name")
                .and_then(Value::as_str)
                .or_else(|| record.pointer("/info/name").and_then(Value::as_str))
                .or_else(|| record.pointer("/info/tags/0").and_then(Value::as_str));

            if let Some(raw) = tech_name {
                let normalized = TechNameNormalizer::normalize(raw);
                if !normalized.is_empty() {
                    detected.insert(normalized);
                }
            }
        }

        detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_prefers_matcher_name() {
        // 测试场景：matcher-name 优先于 info.name
        let stdout = r#"{"matcher-name":"wordpress","info":{"name":"Tech Detect"}}"#;
        let detected = TechScanner::parse_output(stdout);
        assert_eq!(detected.into_iter().collect::<Vec<_>>(), vec!["wordpress"]);
    }

    #[test]
    fn test_parse_output_falls_back_to_info_fields() {
        // 测试场景：缺少 matcher-name 时依次回退 info.name、info.tags[0]
        let stdout = concat!(
            r#"{"info":{"name":"Grafana Detection"}}"#, "\n",
            r#"{"info":{"tags":["jenkins","ci"]}}"#,
        );
        let detected = TechScanner::parse_output(stdout);
        let techs: Vec<_> = detected.into_iter().collect();
        assert_eq!(techs, vec!["grafana", "jenkins"]);
    }

    #[test]
    fn test_parse_output_skips_garbage_lines() {
        // 测试场景：非 JSON 行与空行直接跳过，不影响其余解析
        let stdout = concat!(
            "[INF] Using Nuclei Engine\n",
            "\n",
            r#"{"matcher-name":"nginx"}"#, "\n",
            "not json at all\n",
        );
        let detected = TechScanner::parse_output(stdout);
        assert_eq!(detected.into_iter().collect::<Vec<_>>(), vec!["nginx"]);
    }

    #[test]
    fn test_parse_output_dedupes_normalized_names() {
        // 测试场景：不同写法归一化后落入同一集合元素
        let stdout = concat!(
            r#"{"matcher-name":"WordPress"}"#, "\n",
            r#"{"matcher-name":"wordpress-detect"}"#,
        );
        let detected = TechScanner::parse_output(stdout);
        assert_eq!(detected.len(), 1);
    }

    #[test]
    fn test_parse_output_drops_empty_normalized_names() {
        // 测试场景：归一化后为空的技术名不计入结果
        let stdout = r#"{"matcher-name":"detect"}"#;
        let detected = TechScanner::parse_output(stdout);
        assert!(detected.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_detect_kills_child_after_timeout() {
        // 测试场景：探测超时后子进程必须被终止，不得作为孤儿继续运行
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("nuclei-templates/http/technologies");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("tech-detect.yaml"), "id: tech-detect\n").unwrap();

        // 慢速假 nuclei：若超时后仍存活则落下标记文件
        let marker = dir.path().join("alive.marker");
        let program = dir.path().join("nuclei");
        fs::write(
            &program,
            format!("#!/bin/sh\nsleep 3\ntouch {}\n", marker.display()),
        )
        .unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

        let config = crate::config::ConfigManager::custom()
            .nuclei_path(program)
            .templates_path(dir.path().join("nuclei-templates"))
            .scan_timeout(1)
            .build();
        let scanner = TechScanner::new(&config);

        let detected = scanner.detect("https://timeout.example").await.unwrap();
        assert!(detected.is_empty());

        // 等到原 sleep 窗口结束，标记文件不应出现
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!marker.exists(), "nuclei 子进程在超时后仍存活");
    }
}
