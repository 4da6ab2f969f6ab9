//! 技术名归一化工具
//! 将扫描器输出的技术名转换为字典文件的命名约定

/// 技术名归一化工具
pub struct TechNameNormalizer;

impl TechNameNormalizer {
    /// 归一化技术名（小写、分隔符统一为`-`、去除`.`与 detect/detection 标记）
    pub fn normalize(raw: &str) -> String {
        let mut name = raw.to_lowercase();
        name = name.replace(' ', "-");
        name = name.replace('_', "-");
        name = name.replace('.', "");
        // 先去 detection 再去 detect，避免残留 ion 片段
        name = name.replace("detection", "");
        name = name.replace("detect", "");
        name.trim_matches('-').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercase_and_separators() {
        // 测试场景：大写、空格与下划线统一为中划线
        assert_eq!(TechNameNormalizer::normalize("Apache Tomcat"), "apache-tomcat");
        assert_eq!(TechNameNormalizer::normalize("spring_boot"), "spring-boot");
    }

    #[test]
    fn test_normalize_strips_dots() {
        // 测试场景：版本点号直接去除
        assert_eq!(TechNameNormalizer::normalize("ASP.NET"), "aspnet");
    }

    #[test]
    fn test_normalize_strips_detect_suffix() {
        // 测试场景：nuclei matcher 常见的 -detect / -detection 后缀
        assert_eq!(TechNameNormalizer::normalize("wordpress-detect"), "wordpress");
        assert_eq!(TechNameNormalizer::normalize("jira-detection"), "jira");
        assert_eq!(TechNameNormalizer::normalize("Favicon Detect"), "favicon");
    }

    #[test]
    fn test_normalize_trims_dangling_dashes() {
        // 测试场景：去除标记后首尾不应残留中划线
        assert_eq!(TechNameNormalizer::normalize("detect-nginx"), "nginx");
        assert_eq!(TechNameNormalizer::normalize("-grafana-"), "grafana");
    }

    #[test]
    fn test_normalize_empty_after_stripping() {
        // 测试场景：纯标记名归一化后为空串
        assert_eq!(TechNameNormalizer::normalize("detect"), "");
        assert_eq!(TechNameNormalizer::normalize("tech-detection"), "tech");
    }
}
