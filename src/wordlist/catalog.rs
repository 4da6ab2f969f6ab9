//! 字典目录管理
//! 负责扫描字典目录并建立 技术名 -> 字典文件 的映射

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::normalizer::TechNameNormalizer;
use crate::error::{InterventionError, IvResult};

/// 字典文件命名模式：<tech>_<short|long>.txt
static DICT_FILE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)_(short|long)\.txt$").unwrap()
});

/// 字典模式（短字典/长字典）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DictMode {
    Short,
    Long,
}

impl fmt::Display for DictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictMode::Short => write!(f, "short"),
            DictMode::Long => write!(f, "long"),
        }
    }
}

/// 单个技术可用的字典变体
#[derive(Debug, Clone, Default)]
pub struct WordlistVariants {
    pub short: Option<PathBuf>,
    pub long: Option<PathBuf>,
}

impl WordlistVariants {
    /// 按模式偏好选取字典，首选变体缺失时回退另一变体
    pub fn select(&self, mode: DictMode) -> Option<&PathBuf> {
        match mode {
            DictMode::Short => self.short.as_ref().or(self.long.as_ref()),
            DictMode::Long => self.long.as_ref().or(self.short.as_ref()),
        }
    }
}

/// 字典目录
pub struct WordlistCatalog {
    // BTreeMap 保证模糊匹配的扫描顺序稳定
    entries: BTreeMap<String, WordlistVariants>,
}

impl WordlistCatalog {
    /// 扫描字典目录并建立映射
    pub fn load(dict_path: &Path) -> IvResult<Self> {
        if !dict_path.is_dir() {
            return Err(InterventionError::DictDirNotFound(
                dict_path.display().to_string(),
            ));
        }

        let mut entries: BTreeMap<String, WordlistVariants> = BTreeMap::new();
        let read_dir = std::fs::read_dir(dict_path).map_err(|e| {
            InterventionError::CatalogScanError(format!("{}：{}", dict_path.display(), e))
        })?;

        for entry in read_dir {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(caps) = DICT_FILE_PATTERN.captures(name) else {
                continue;
            };

            let variants = entries.entry(caps[1].to_string()).or_default();
            match &caps[2] {
                "short" => variants.short = Some(entry.path()),
                _ => variants.long = Some(entry.path()),
            }
        }

        debug!("字典目录扫描完成，共 {} 个技术", entries.len());
        Ok(Self { entries })
    }

    /// 目录中的技术数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 查找技术对应的字典文件（先精确匹配，再子串模糊匹配）
    pub fn find_matching(&self, tech_name: &str, mode: DictMode) -> Option<&PathBuf> {
        let normalized = TechNameNormalizer::normalize(tech_name);
        // 空名会与任意键构成子串关系，直接判定无匹配
        if normalized.is_empty() {
            return None;
        }

        // 1. 精确匹配
        if let Some(path) = self.entries.get(&normalized).and_then(|v| v.select(mode)) {
            return Some(path);
        }

        // 2. 模糊匹配：归一化名与目录键互为子串，首个命中生效
        for (key, variants) in &self.entries {
            if key == &normalized {
                continue;
            }
            if normalized.contains(key.as_str()) || key.contains(&normalized) {
                if let Some(path) = variants.select(mode) {
                    return Some(path);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in [
            "wordpress_long.txt",
            "wordpress_short.txt",
            "drupal_long.txt",
            "nginx_short.txt",
        ] {
            fs::write(dir.path().join(name), "admin\n").unwrap();
        }
        // 不符合命名约定的文件应被忽略
        fs::write(dir.path().join("README.md"), "#").unwrap();
        fs::write(dir.path().join("misc.txt"), "x\n").unwrap();
        dir
    }

    #[test]
    fn test_load_builds_catalog_from_conventional_names() {
        // 测试场景：仅 <tech>_<short|long>.txt 文件进入目录映射
        let dir = fixture_dir();
        let catalog = WordlistCatalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_load_missing_dir_is_fatal() {
        // 测试场景：字典目录不存在应返回错误
        let result = WordlistCatalog::load(Path::new("/nonexistent/dict"));
        assert!(matches!(result, Err(InterventionError::DictDirNotFound(_))));
    }

    #[test]
    fn test_find_matching_exact_with_mode() {
        // 测试场景：精确匹配且按模式选取变体
        let dir = fixture_dir();
        let catalog = WordlistCatalog::load(dir.path()).unwrap();

        let long = catalog.find_matching("WordPress", DictMode::Long).unwrap();
        assert!(long.ends_with("wordpress_long.txt"));

        let short = catalog.find_matching("WordPress", DictMode::Short).unwrap();
        assert!(short.ends_with("wordpress_short.txt"));
    }

    #[test]
    fn test_find_matching_falls_back_across_variants() {
        // 测试场景：nginx 仅有短字典，长模式下应回退
        let dir = fixture_dir();
        let catalog = WordlistCatalog::load(dir.path()).unwrap();

        let path = catalog.find_matching("nginx", DictMode::Long).unwrap();
        assert!(path.ends_with("nginx_short.txt"));
    }

    #[test]
    fn test_find_matching_fuzzy_substring() {
        // 测试场景：归一化名与目录键互为子串时模糊命中
        let dir = fixture_dir();
        let catalog = WordlistCatalog::load(dir.path()).unwrap();

        // matcher 名带 detect 后缀，归一化后精确命中
        let path = catalog.find_matching("wordpress-detect", DictMode::Long).unwrap();
        assert!(path.ends_with("wordpress_long.txt"));

        // 归一化名是目录键的前缀子串
        let path = catalog.find_matching("word", DictMode::Long).unwrap();
        assert!(path.ends_with("wordpress_long.txt"));
    }

    #[test]
    fn test_find_matching_none_for_unknown_or_empty() {
        // 测试场景：未知技术与空归一化名均无匹配
        let dir = fixture_dir();
        let catalog = WordlistCatalog::load(dir.path()).unwrap();

        assert!(catalog.find_matching("joomla", DictMode::Long).is_none());
        assert!(catalog.find_matching("detect", DictMode::Long).is_none());
    }
}
