// ==========================================
// 产能目录 - 目录与派生索引
// ==========================================
// 职责: 有序模板序列 + 按 id/code/类别/来源 的查询索引
// 红线: 构建后只读；索引随目录整体重建，不做增量修改
// ==========================================

use crate::domain::productivity::ProductivityTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Catalog - 产能目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: Vec<ProductivityTemplate>,
    by_id: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
    by_category: HashMap<String, Vec<usize>>, // 仅 active
    by_source: HashMap<String, Vec<usize>>,   // 仅 active
    category_order: Vec<String>,
}

impl Catalog {
    /// 由有序模板序列构建目录（重建全部索引）
    ///
    /// 重复 id/code 时保留目录顺序中的第一条
    pub fn from_templates(templates: Vec<ProductivityTemplate>) -> Self {
        let mut by_id = HashMap::with_capacity(templates.len());
        let mut by_code = HashMap::with_capacity(templates.len());
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_source: HashMap<String, Vec<usize>> = HashMap::new();
        let mut category_order: Vec<String> = Vec::new();

        for (idx, template) in templates.iter().enumerate() {
            by_id.entry(template.id.clone()).or_insert(idx);
            by_code.entry(template.code.clone()).or_insert(idx);

            if !category_order.contains(&template.category_id) {
                category_order.push(template.category_id.clone());
            }

            if template.is_active {
                by_category
                    .entry(template.category_id.clone())
                    .or_default()
                    .push(idx);
                by_source
                    .entry(template.source.clone())
                    .or_default()
                    .push(idx);
            }
        }

        Self {
            templates,
            by_id,
            by_code,
            by_category,
            by_source,
            category_order,
        }
    }

    pub fn templates(&self) -> &[ProductivityTemplate] {
        &self.templates
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductivityTemplate> {
        self.templates.iter()
    }

    pub fn into_templates(self) -> Vec<ProductivityTemplate> {
        self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn total(&self) -> usize {
        self.templates.len()
    }

    pub fn active_count(&self) -> usize {
        self.templates.iter().filter(|t| t.is_active).count()
    }

    /// 按 id 精确查询
    pub fn get_by_id(&self, id: &str) -> Option<&ProductivityTemplate> {
        self.by_id.get(id).map(|&idx| &self.templates[idx])
    }

    /// 按 code 精确查询
    pub fn get_by_code(&self, code: &str) -> Option<&ProductivityTemplate> {
        self.by_code.get(code).map(|&idx| &self.templates[idx])
    }

    /// 按类别过滤（仅 active，目录顺序）
    pub fn by_category(&self, category_id: &str) -> Vec<&ProductivityTemplate> {
        self.collect(self.by_category.get(category_id))
    }

    /// 按来源过滤（仅 active，目录顺序）
    pub fn by_source(&self, source: &str) -> Vec<&ProductivityTemplate> {
        self.collect(self.by_source.get(source))
    }

    /// 名称搜索: 阿拉伯语名称子串匹配，或英文名称忽略大小写匹配
    pub fn search(&self, query: &str) -> Vec<&ProductivityTemplate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let lower = query.to_lowercase();

        self.templates
            .iter()
            .filter(|t| {
                t.name_ar.contains(query)
                    || t
                        .name_en
                        .as_ref()
                        .map(|en| en.to_lowercase().contains(&lower))
                        .unwrap_or(false)
            })
            .collect()
    }

    /// 类别（首次出现顺序）
    pub fn category_ids(&self) -> &[String] {
        &self.category_order
    }

    /// 各类别模板数量（首次出现顺序，含非 active）
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        self.category_order
            .iter()
            .map(|category| {
                let count = self
                    .templates
                    .iter()
                    .filter(|t| &t.category_id == category)
                    .count();
                (category.clone(), count)
            })
            .collect()
    }

    fn collect(&self, indices: Option<&Vec<usize>>) -> Vec<&ProductivityTemplate> {
        indices
            .map(|ids| ids.iter().map(|&idx| &self.templates[idx]).collect())
            .unwrap_or_default()
    }
}

// ==========================================
// CatalogExport - 目录导出文档
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExport {
    #[serde(default)]
    pub run_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub active: usize,
    pub templates: Vec<ProductivityTemplate>,
}

impl CatalogExport {
    pub fn from_catalog(catalog: &Catalog, run_id: Option<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            generated_at,
            total: catalog.total(),
            active: catalog.active_count(),
            templates: catalog.templates().to_vec(),
        }
    }

    pub fn into_catalog(self) -> Catalog {
        Catalog::from_templates(self.templates)
    }
}
