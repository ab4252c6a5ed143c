// ==========================================
// 产能目录 - 多来源产能对比
// ==========================================
// 规则: code 按分隔符切分，取前两段为前缀；
//       收集 code 以该前缀开头的全部 active 条目，计算产能均值
// 代表字段: code/name_ar/unit 取目录顺序中的首个匹配
// 红线: 只读；无匹配返回 None，不构造默认记录
// ==========================================

use crate::domain::catalog::Catalog;
use crate::domain::productivity::{MultiSourceProductivity, SourceRate};
use tracing::debug;

pub struct MultiSourceAggregator<'a> {
    catalog: &'a Catalog,
    separator: &'a str,
}

impl<'a> MultiSourceAggregator<'a> {
    pub fn new(catalog: &'a Catalog, separator: &'a str) -> Self {
        Self { catalog, separator }
    }

    /// 前两段前缀（不足两段则取全部）
    pub fn prefix_of(&self, code: &str) -> String {
        code.split(self.separator)
            .take(2)
            .collect::<Vec<_>>()
            .join(self.separator)
    }

    pub fn compare(&self, code: &str) -> Option<MultiSourceProductivity> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        let prefix = self.prefix_of(code);

        let matches: Vec<_> = self
            .catalog
            .iter()
            .filter(|t| t.is_active && t.code.starts_with(&prefix))
            .collect();
        let first = matches.first()?;

        let sources: Vec<SourceRate> = matches
            .iter()
            .map(|t| SourceRate {
                source: t.source.clone(),
                productivity_rate: t.productivity_rate,
                crew_size: t.crew_size,
            })
            .collect();
        let average_rate =
            sources.iter().map(|s| s.productivity_rate).sum::<f64>() / sources.len() as f64;

        debug!(prefix = %prefix, matches = sources.len(), average_rate, "多来源对比");

        Some(MultiSourceProductivity {
            code: first.code.clone(),
            prefix,
            name_ar: first.name_ar.clone(),
            unit: first.unit.clone(),
            sources,
            average_rate,
        })
    }
}
