//! 结果输出模块：JSON 报告落盘与终端摘要展示

use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::analysis::InterestingHit;
use crate::config::GlobalConfig;
use crate::error::{InterventionError, IvResult};
use crate::wordlist::DictMode;

/// 单个目标的 JSON 报告结构
#[derive(Debug, Serialize)]
pub struct UrlReport<'a> {
    pub url: &'a str,
    pub mode: DictMode,
    pub occurrence_threshold: usize,
    pub technologies_detected: Vec<&'a str>,
    pub results_by_tech: &'a BTreeMap<String, usize>,
    pub results: &'a [InterestingHit],
}

/// 结果输出器
pub struct ReportWriter;

impl ReportWriter {
    /// 将目标的过滤结果保存为 JSON 报告，返回报告路径
    pub fn save(
        url: &str,
        hits: &[InterestingHit],
        results_by_tech: &BTreeMap<String, usize>,
        config: &GlobalConfig,
    ) -> IvResult<PathBuf> {
        let report = UrlReport {
            url,
            mode: config.mode,
            occurrence_threshold: config.occurrence,
            technologies_detected: results_by_tech.keys().map(String::as_str).collect(),
            results_by_tech,
            results: hits,
        };

        let path = PathBuf::from(format!(
            "intervention_results_{}.json",
            Self::sanitize_url(url)
        ));
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json).map_err(|e| {
            InterventionError::ReportError(format!("{}：{}", path.display(), e))
        })?;

        debug!("报告已写入：{}", path.display());
        Ok(path)
    }

    /// 终端摘要：按技术统计 + 按（频次，长度）排序的结果表
    pub fn display(
        url: &str,
        hits: &[InterestingHit],
        results_by_tech: &BTreeMap<String, usize>,
        threshold: usize,
    ) {
        if hits.is_empty() {
            return;
        }

        if results_by_tech.len() > 1 {
            println!("\n{}", "按技术统计：".cyan().bold());
            for (tech, count) in results_by_tech {
                println!("  • {}：{} 条", tech, count);
            }
        }

        println!(
            "\n{}",
            format!("目标 {} 的有趣结果（长度频次 ≤ {}）", url, threshold).bold()
        );
        println!(
            "{:<52} {:<18} {:>6} {:>10} {:>6}",
            "URL", "技术", "状态", "长度", "频次"
        );

        let mut sorted: Vec<&InterestingHit> = hits.iter().collect();
        sorted.sort_by_key(|hit| (hit.occurrence_count, hit.record.length));

        for hit in sorted {
            // 先按纯文本补齐列宽再上色，ANSI 转义序列不得计入对齐
            let url_col = format!("{:<52}", hit.record.url);
            let tech_col = format!("{:<18}", hit.tech);
            let status_col = format!("{:>6}", hit.record.status);
            println!(
                "{} {} {} {:>10} {:>6}",
                url_col.cyan(),
                tech_col.blue(),
                Self::colorize_status(&status_col, hit.record.status),
                hit.record.length,
                hit.occurrence_count
            );
        }

        println!(
            "{} 共 {} 条有趣结果，覆盖 {} 项技术",
            "✓".green(),
            hits.len(),
            results_by_tech.len()
        );
    }

    // 2xx 绿 / 3xx 黄 / 4xx 红，入参为已补齐列宽的纯文本
    pub(crate) fn colorize_status(text: &str, status: u16) -> String {
        match status {
            200..=299 => text.green().to_string(),
            300..=399 => text.yellow().to_string(),
            _ => text.red().to_string(),
        }
    }

    /// 报告文件名中的 URL 安全化
    pub(crate) fn sanitize_url(url: &str) -> String {
        url.replace("://", "_").replace('/', "_").replace(':', "_")
    }
}
