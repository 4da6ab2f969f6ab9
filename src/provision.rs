//! 仓库预备模块：按需克隆 OneListForAll 字典仓库与 nuclei-templates 模板仓库
//! 克隆动作委托给外部 git 命令

use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;

use colored::Colorize;
use tokio::process::Command;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::GlobalConfig;
use crate::error::{InterventionError, IvResult};

const ONELISTFORALL_REPO: &str = "https://github.com/six2dez/OneListForAll.git";
const NUCLEI_TEMPLATES_REPO: &str = "https://github.com/projectdiscovery/nuclei-templates.git";

/// 仓库预备器
pub struct RepoProvisioner;

impl RepoProvisioner {
    /// 确保字典仓库与模板仓库均已就绪，缺失时自动克隆
    pub async fn ensure(config: &GlobalConfig) -> IvResult<()> {
        Self::ensure_wordlists(&config.dict_path).await?;
        Self::ensure_templates(&config.templates_path).await?;
        Ok(())
    }

    /// 字典目录下存在任意 .txt 即视为已就绪
    async fn ensure_wordlists(dict_path: &Path) -> IvResult<()> {
        if Self::has_wordlists(dict_path) {
            println!("{} OneListForAll 已就绪", "✓".green());
            return Ok(());
        }

        println!("{} 正在克隆 OneListForAll...", "↓".cyan());
        // 克隆落点沿用字典目录上级的 OneListForAll 目录约定
        let parent = dict_path.parent().unwrap_or(Path::new("."));
        let clone_dir = if parent.file_name().is_some_and(|name| name == "OneListForAll") {
            parent.to_path_buf()
        } else {
            parent.join("OneListForAll")
        };

        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // 清掉残缺的旧副本，git clone 要求目标目录不存在
        if clone_dir.exists() {
            tokio::fs::remove_dir_all(&clone_dir).await?;
        }

        Self::git_clone(ONELISTFORALL_REPO, &clone_dir).await?;
        println!("{} OneListForAll 克隆完成", "✓".green());
        Ok(())
    }

    /// 模板目录下递归存在任意 .yaml 即视为已就绪
    async fn ensure_templates(templates_path: &Path) -> IvResult<()> {
        if Self::has_templates(templates_path) {
            println!("{} nuclei-templates 已就绪", "✓".green());
            return Ok(());
        }

        println!("{} 正在克隆 nuclei-templates...", "↓".cyan());
        if let Some(parent) = templates_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        if templates_path.exists() {
            tokio::fs::remove_dir_all(templates_path).await?;
        }

        Self::git_clone(NUCLEI_TEMPLATES_REPO, templates_path).await?;
        println!("{} nuclei-templates 克隆完成", "✓".green());
        Ok(())
    }

    pub(crate) fn has_wordlists(dict_path: &Path) -> bool {
        let Ok(read_dir) = std::fs::read_dir(dict_path) else {
            return false;
        };
        read_dir
            .filter_map(Result::ok)
            .any(|entry| entry.path().extension().is_some_and(|ext| ext == "txt"))
    }

    pub(crate) fn has_templates(templates_path: &Path) -> bool {
        if !templates_path.is_dir() {
            return false;
        }
        WalkDir::new(templates_path)
            .into_iter()
            .filter_map(Result::ok)
            .any(|entry| entry.path().extension().is_some_and(|ext| ext == "yaml"))
    }

    /// 调用外部 git 克隆仓库
    async fn git_clone(repo: &str, dest: &Path) -> IvResult<()> {
        debug!("git clone {} -> {}", repo, dest.display());
        let output = Command::new("git")
            .arg("clone")
            .arg(repo)
            .arg(dest)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => InterventionError::ToolNotFound("git".to_string()),
                _ => InterventionError::CloneError(format!("git 启动失败：{}", e)),
            })?;

        if !output.status.success() {
            return Err(InterventionError::CloneError(format!(
                "{}：{}",
                repo,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_has_wordlists_requires_txt_files() {
        // 测试场景：目录存在但无 .txt 文件视为未就绪
        let dir = TempDir::new().unwrap();
        assert!(!RepoProvisioner::has_wordlists(dir.path()));

        fs::write(dir.path().join("README.md"), "#").unwrap();
        assert!(!RepoProvisioner::has_wordlists(dir.path()));

        fs::write(dir.path().join("wordpress_long.txt"), "admin\n").unwrap();
        assert!(RepoProvisioner::has_wordlists(dir.path()));
    }

    #[test]
    fn test_has_wordlists_missing_dir() {
        // 测试场景：目录不存在直接判未就绪
        assert!(!RepoProvisioner::has_wordlists(Path::new("/nonexistent/dict")));
    }

    #[test]
    fn test_has_templates_recursive_yaml_lookup() {
        // 测试场景：.yaml 允许出现在任意深度的子目录
        let dir = TempDir::new().unwrap();
        assert!(!RepoProvisioner::has_templates(dir.path()));

        let nested = dir.path().join("http/technologies");
        fs::create_dir_all(&nested).unwrap();
        assert!(!RepoProvisioner::has_templates(dir.path()));

        fs::write(nested.join("tech-detect.yaml"), "id: tech-detect\n").unwrap();
        assert!(RepoProvisioner::has_templates(dir.path()));
    }
}
