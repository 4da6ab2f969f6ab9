//! 编排核心：串联技术探测、字典匹配、路径爆破与结果过滤

use std::collections::BTreeMap;

use colored::Colorize;
use tracing::{debug, warn};

use crate::analysis::{InterestingHit, OccurrenceFilter};
use crate::config::GlobalConfig;
use crate::error::IvResult;
use crate::fuzzer::Fuzzer;
use crate::report::ReportWriter;
use crate::scanner::TechScanner;
use crate::wordlist::WordlistCatalog;

/// 编排器
pub struct Intervention {
    config: GlobalConfig,
    catalog: WordlistCatalog,
    scanner: TechScanner,
    fuzzer: Fuzzer,
}

impl Intervention {
    /// 创建编排器（加载字典目录并初始化外部工具封装）
    pub fn new(config: GlobalConfig) -> IvResult<Self> {
        let catalog = WordlistCatalog::load(&config.dict_path)?;
        debug!("共加载 {} 个技术字典", catalog.len());
        if catalog.is_empty() {
            warn!("字典目录 {} 下没有符合命名约定的字典", config.dict_path.display());
        }

        let scanner = TechScanner::new(&config);
        let fuzzer = Fuzzer::new(&config);

        Ok(Self {
            config,
            catalog,
            scanner,
            fuzzer,
        })
    }

    /// 处理单个目标 URL 的完整流程
    pub async fn process_url(&self, url: &str) -> IvResult<()> {
        println!("\n{}", format!("▶ 开始处理 {}", url).blue().bold());

        // 1. 技术探测
        let detected = self.scanner.detect(url).await?;
        if detected.is_empty() {
            println!("{} 未探测到任何技术：{}", "⚠".yellow(), url);
            return Ok(());
        }
        println!("{} 探测到 {} 项技术", "✓".green(), detected.len());

        // 2. 逐技术匹配字典并爆破
        let mut all_hits: Vec<InterestingHit> = Vec::new();
        let mut results_by_tech: BTreeMap<String, usize> = BTreeMap::new();

        for tech in &detected {
            let Some(dict) = self.catalog.find_matching(tech, self.config.mode) else {
                debug!("未找到 {} 对应的字典，跳过", tech);
                if self.config.verbose {
                    println!("  {} 未找到 {} 对应的字典，跳过", "⚠".yellow(), tech);
                }
                continue;
            };
            let dict_name = dict
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("{} 命中字典：{}", tech, dict_name);
            if self.config.verbose {
                println!("  {} {} 命中字典：{}", "✓".green(), tech, dict_name);
            }

            // 3. 路径爆破
            let records = self.fuzzer.run(url, dict, tech).await?;
            if records.is_empty() {
                continue;
            }

            // 4. 长度频次过滤 + 来源注记
            let filtered = OccurrenceFilter::filter(records, self.config.occurrence);
            if filtered.is_empty() {
                continue;
            }
            debug!("{} 过滤后剩余 {} 条结果", tech, filtered.len());

            results_by_tech.insert(tech.clone(), filtered.len());
            all_hits.extend(filtered.into_iter().map(|(record, count)| {
                InterestingHit::annotate(record, count, tech.clone(), dict_name.clone())
            }));
        }

        // 5. 保存与展示
        if all_hits.is_empty() {
            println!("{} 未发现有趣结果：{}", "⚠".yellow(), url);
            return Ok(());
        }
        let report_path = ReportWriter::save(url, &all_hits, &results_by_tech, &self.config)?;
        println!("{} 结果已保存至 {}", "✓".green(), report_path.display());
        ReportWriter::display(url, &all_hits, &results_by_tech, self.config.occurrence);

        Ok(())
    }

    /// 对所有目标顺序执行编排流程
    pub async fn run(&self, urls: &[String]) -> IvResult<()> {
        println!(
            "{}",
            format!(
                "intervention | 模式：{} | 频次阈值：{} | 目标数：{}",
                self.config.mode,
                self.config.occurrence,
                urls.len()
            )
            .bold()
        );

        for url in urls {
            self.process_url(url).await?;
        }

        println!("\n{}", "✓ 全部目标处理完成".green().bold());
        Ok(())
    }
}
