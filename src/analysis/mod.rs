//! 结果分析模块：基于响应长度出现频次的噪声过滤
//! 同一长度大量出现通常是通配响应或模板页，仅保留低频"有趣"结果

use std::collections::HashMap;

use serde::Serialize;

use crate::fuzzer::DiscoveryRecord;

/// 过滤后保留的"有趣"结果（附加频次与来源注记）
#[derive(Debug, Clone, Serialize)]
pub struct InterestingHit {
    #[serde(flatten)]
    pub record: DiscoveryRecord,
    pub occurrence_count: usize,
    pub tech: String,
    pub dict_used: String,
}

impl InterestingHit {
    /// 为过滤结果附加技术名与所用字典文件名
    pub fn annotate(
        record: DiscoveryRecord,
        occurrence_count: usize,
        tech: String,
        dict_used: String,
    ) -> Self {
        Self {
            record,
            occurrence_count,
            tech,
            dict_used,
        }
    }
}

/// 长度频次过滤器
pub struct OccurrenceFilter;

impl OccurrenceFilter {
    /// 按长度频次过滤一批发现记录，返回记录与其长度频次
    /// 频次统计仅在本批（单技术单字典）内进行
    pub fn filter(
        records: Vec<DiscoveryRecord>,
        threshold: usize,
    ) -> Vec<(DiscoveryRecord, usize)> {
        let mut length_counts: HashMap<u64, usize> = HashMap::new();
        for record in &records {
            *length_counts.entry(record.length).or_insert(0) += 1;
        }

        records
            .into_iter()
            .filter_map(|record| {
                let count = length_counts[&record.length];
                (count <= threshold).then_some((record, count))
            })
            .collect()
    }
}
