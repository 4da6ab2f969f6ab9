//! intervention 命令行入口

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use intervention::{ConfigManager, DictMode, Intervention, RepoProvisioner};

#[derive(Parser, Debug)]
#[command(
    name = "intervention",
    version,
    about = "基于技术指纹的智能路径爆破编排工具（联动 nuclei 与 ffuf）"
)]
struct Cli {
    /// 目标 URL 或包含 URL 列表的文件（每行一个）
    #[arg(required = true)]
    urls: Vec<String>,

    /// 字典目录路径
    #[arg(long, default_value = "OneListForAll/dict")]
    dict: PathBuf,

    /// nuclei 模板目录路径
    #[arg(long = "nuclei-templates", default_value = "nuclei-templates")]
    nuclei_templates: PathBuf,

    /// 字典模式
    #[arg(long, value_enum, default_value_t = DictMode::Long)]
    mode: DictMode,

    /// 判定"有趣"结果的最大长度频次
    #[arg(long, default_value_t = 10)]
    occurrence: usize,

    /// 输出详细日志
    #[arg(short, long)]
    verbose: bool,

    /// 禁用仓库自动克隆
    #[arg(long = "no-auto-clone")]
    no_auto_clone: bool,
}

/// 初始化日志，RUST_LOG 优先，其次按 -v 决定默认级别
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// 展开 URL 参数：文件参数逐行读取为 URL 列表，空行跳过
fn expand_urls(args: &[String]) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for arg in args {
        if Path::new(arg).is_file() {
            let content = std::fs::read_to_string(arg)?;
            urls.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from),
            );
        } else {
            urls.push(arg.clone());
        }
    }
    Ok(urls)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ConfigManager::custom()
        .dict_path(cli.dict)
        .templates_path(cli.nuclei_templates)
        .mode(cli.mode)
        .occurrence(cli.occurrence)
        .verbose(cli.verbose)
        .build();

    if !cli.no_auto_clone {
        RepoProvisioner::ensure(&config).await?;
    }

    let urls = expand_urls(&cli.urls)?;
    let intervention = Intervention::new(config)?;
    intervention.run(&urls).await?;

    Ok(())
}
