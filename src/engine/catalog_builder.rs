// ==========================================
// 产能目录 - 目录构建器
// ==========================================
// 职责: 按类别分组（首次出现顺序 + 类别内输入顺序）
//       → 文本规范化 → 班组解析 → 编号 → 模板 → 目录
// 红线: 单次批处理，不修改输入；产能值缺失为硬失败
// ==========================================

use crate::config::catalog_config::CatalogConfig;
use crate::domain::catalog::Catalog;
use crate::domain::productivity::{crew_size, ProductivityTemplate, RawProductivityRecord};
use crate::domain::types::is_known_source;
use crate::engine::identifier::{AssignedIdentifier, IdentifierAssigner};
use crate::importer::crew_parser::{CrewMatch, CrewParser};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::text_normalizer::{normalize_null, normalize_text};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument, warn};

// ==========================================
// 构建报告
// ==========================================

/// 非空但无法识别的班组描述（原文保留供人工复核）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnparsedCrew {
    pub row: usize,
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogBuildReport {
    pub total_records: usize,
    pub category_counts: Vec<(String, usize)>,
    pub rule_hits: BTreeMap<String, usize>,
    pub empty_crew: usize,
    pub unparsed_crew: Vec<UnparsedCrew>,
    pub unknown_sources: Vec<String>, // 不在已知来源表中（首次出现顺序）
}

impl CatalogBuildReport {
    pub fn has_unparsed_crew(&self) -> bool {
        !self.unparsed_crew.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    pub report: CatalogBuildReport,
}

// ==========================================
// CatalogBuilder - 目录构建器
// ==========================================
pub struct CatalogBuilder<'a> {
    config: &'a CatalogConfig,
    parser: CrewParser,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self {
            config,
            parser: CrewParser::new(config.roles.clone()),
        }
    }

    /// 使用自定义解析器（扩展规则表）
    pub fn with_parser(config: &'a CatalogConfig, parser: CrewParser) -> Self {
        Self { config, parser }
    }

    /// 构建完整目录
    ///
    /// # 返回
    /// - Ok(CatalogBuild): 目录 + 构建报告
    /// - Err: 产能值缺失/越界（记录号为输入中的 1 基位置）、标识冲突
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn build(&self, records: &[RawProductivityRecord]) -> ImportResult<CatalogBuild> {
        // === 步骤 1: 必填字段校验（按输入顺序，报告最早的缺陷行）===
        let mut rates = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            rates.push(validate_rate(idx + 1, record)?);
        }

        // === 步骤 2: 按类别分组 ===
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        let mut group_index: HashMap<&str, usize> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            let slot = *group_index
                .entry(record.category.as_str())
                .or_insert_with(|| {
                    groups.push((record.category.as_str(), Vec::new()));
                    groups.len() - 1
                });
            groups[slot].1.push(idx);
        }
        debug!(categories = groups.len(), "分组完成");

        // === 步骤 3: 编号 + 模板构建 ===
        let assigner = IdentifierAssigner::new(self.config);
        let mut report = CatalogBuildReport {
            total_records: records.len(),
            ..CatalogBuildReport::default()
        };
        let mut templates = Vec::with_capacity(records.len());
        let mut seen_ids: HashMap<String, String> = HashMap::new();
        let mut seen_codes: HashMap<String, String> = HashMap::new();

        for (category, indices) in &groups {
            for (position, &idx) in indices.iter().enumerate() {
                let sequence = u32::try_from(position + 1).map_err(|_| {
                    ImportError::InternalError(format!("类别 {} 记录数超出序号范围", category))
                })?;
                let ident = assigner.assign(category, sequence);
                claim(&mut seen_ids, &ident.id, category)?;
                claim(&mut seen_codes, &ident.code, category)?;

                let template =
                    self.build_template(idx + 1, &records[idx], rates[idx], ident, &mut report);
                templates.push(template);
            }
            report
                .category_counts
                .push((category.to_string(), indices.len()));
        }

        let catalog = Catalog::from_templates(templates);
        info!(
            total = catalog.total(),
            categories = report.category_counts.len(),
            unparsed_crew = report.unparsed_crew.len(),
            "目录构建完成"
        );

        Ok(CatalogBuild { catalog, report })
    }

    fn build_template(
        &self,
        row: usize,
        record: &RawProductivityRecord,
        productivity_rate: f64,
        ident: AssignedIdentifier,
        report: &mut CatalogBuildReport,
    ) -> ProductivityTemplate {
        let parse = self.parser.classify(&record.crew_text);
        match parse.outcome {
            CrewMatch::Empty => report.empty_crew += 1,
            CrewMatch::Rule(name) => {
                *report.rule_hits.entry(name.to_string()).or_default() += 1;
            }
            CrewMatch::Unrecognized => {
                warn!(row = row, id = %ident.id, crew = %parse.text, "班组描述无法识别，按空班组处理");
                report.unparsed_crew.push(UnparsedCrew {
                    row,
                    id: ident.id.clone(),
                    text: parse.text.clone(),
                });
            }
        }

        if !is_known_source(&record.source) && !report.unknown_sources.contains(&record.source) {
            debug!(row = row, source = %record.source, "未知数据来源");
            report.unknown_sources.push(record.source.clone());
        }

        let unit = normalize_text(&record.unit);
        let crew_text = if parse.text.is_empty() {
            None
        } else {
            Some(parse.text)
        };

        ProductivityTemplate {
            id: ident.id,
            code: ident.code,
            sequence: ident.sequence,
            name_ar: normalize_text(&record.description),
            name_en: normalize_null(record.description_en.as_deref()),
            category_id: record.category.clone(),
            unit: unit.clone(),
            unit_ar: unit,
            productivity_rate,
            crew_size: crew_size(&parse.members),
            crew: parse.members,
            source: record.source.clone(),
            source_ref: Some(record.source.clone()),
            notes: normalize_null(record.note.as_deref()),
            crew_text,
            is_active: true,
        }
    }
}

/// 产能值: 必须存在、有限且为正
fn validate_rate(row: usize, record: &RawProductivityRecord) -> ImportResult<f64> {
    match record.productivity_rate {
        None => Err(ImportError::MissingProductivityRate {
            row,
            category: record.category.clone(),
            description: normalize_text(&record.description),
        }),
        Some(value) if !value.is_finite() || value <= 0.0 => {
            Err(ImportError::ProductivityRateOutOfRange { row, value })
        }
        Some(value) => Ok(value),
    }
}

/// 登记标识；跨类别重复（如两个未识别类别共用通用前缀）为硬失败
fn claim(seen: &mut HashMap<String, String>, key: &str, category: &str) -> ImportResult<()> {
    if let Some(first) = seen.get(key) {
        return Err(ImportError::DuplicateIdentifier {
            id: key.to_string(),
            first_category: first.clone(),
            second_category: category.to_string(),
        });
    }
    seen.insert(key.to_string(), category.to_string());
    Ok(())
}
