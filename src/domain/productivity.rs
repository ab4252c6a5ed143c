// ==========================================
// 产能目录 - 产能领域模型
// ==========================================
// 职责: 原始产能记录 / 班组成员 / 产能模板 / BOQ 行
// 红线: 模板独占其班组列表，不共享
// ==========================================

use crate::domain::types::ResourceKind;
use serde::{Deserialize, Serialize};

// ==========================================
// RawProductivityRecord - 导入中间结构体
// ==========================================
// 用途: 一行电子表格（字段映射后），只读
// 生命周期: 仅在目录生成流程内
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProductivityRecord {
    pub category: String,                // 工作类别（如 electrical）
    pub description: String,             // 阿拉伯语工作描述
    #[serde(default)]
    pub description_en: Option<String>,  // 英文描述（可选）
    pub unit: String,                    // 计量单位
    #[serde(alias = "productivity")]
    pub productivity_rate: Option<f64>,  // 每班组每日完成量（缺失 = 上游缺陷）
    #[serde(default, alias = "crew")]
    pub crew_text: String,               // 班组描述（可能为空）
    #[serde(alias = "sheet")]
    pub source: String,                  // 数据来源（工作表名）
    #[serde(default)]
    pub note: Option<String>,            // 备注
}

// ==========================================
// CrewMember - 班组成员
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub role_code: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
    pub description: String,
    #[serde(default)]
    pub kind: ResourceKind,
}

impl CrewMember {
    pub fn new(role_code: impl Into<String>, quantity: u32, description: &str, kind: ResourceKind) -> Self {
        Self {
            role_code: role_code.into(),
            quantity,
            description: description.to_string(),
            kind,
        }
    }
}

/// 班组人数: 成员数量之和（饱和加法），空班组记为 1
pub fn crew_size(crew: &[CrewMember]) -> u32 {
    if crew.is_empty() {
        1
    } else {
        crew.iter().fold(0u32, |acc, m| acc.saturating_add(m.quantity))
    }
}

// ==========================================
// ProductivityTemplate - 产能模板
// ==========================================
// 标识: (category, sequence) 的稳定函数，与内容无关
// 限制: 同类别内插入/删除前序行会使后续编号整体平移
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityTemplate {
    pub id: String,
    pub code: String,
    pub sequence: u32,
    pub name_ar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    pub category_id: String,
    pub unit: String,
    pub unit_ar: String,
    pub productivity_rate: f64,
    pub crew_size: u32,
    pub crew: Vec<CrewMember>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_text: Option<String>,
    pub is_active: bool,
}

impl ProductivityTemplate {
    /// 转换为 BOQ 模板行（人工/机械分栏，材料为空）
    pub fn to_boq_template(&self) -> BoqTemplate {
        let component = |m: &CrewMember| ComponentItem {
            rate_code: m.role_code.clone(),
            qty: f64::from(m.quantity),
            description: m.description.clone(),
        };

        BoqTemplate {
            code: self.code.clone(),
            name_ar: self.name_ar.clone(),
            name_en: self.name_en.clone(),
            unit: self.unit_ar.clone(),
            productivity_rate: self.productivity_rate,
            crew_size: self.crew_size,
            labor: self
                .crew
                .iter()
                .filter(|m| m.kind == ResourceKind::Labor)
                .map(component)
                .collect(),
            materials: Vec::new(),
            equipment: self
                .crew
                .iter()
                .filter(|m| m.kind == ResourceKind::Equipment)
                .map(component)
                .collect(),
            source: self.source.clone(),
            source_ref: self.source_ref.clone(),
        }
    }
}

// ==========================================
// BoqTemplate - 工程量清单模板行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentItem {
    #[serde(rename = "rateCode")]
    pub rate_code: String,
    pub qty: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqTemplate {
    pub code: String,
    pub name_ar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    pub unit: String,
    pub productivity_rate: f64,
    pub crew_size: u32,
    pub labor: Vec<ComponentItem>,
    pub materials: Vec<ComponentItem>,
    pub equipment: Vec<ComponentItem>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

// ==========================================
// MultiSourceProductivity - 多来源对比结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRate {
    pub source: String,
    pub productivity_rate: f64,
    pub crew_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSourceProductivity {
    /// 首个匹配条目的完整编码
    pub code: String,
    /// 用于匹配的前两段前缀
    pub prefix: String,
    pub name_ar: String,
    pub unit: String,
    pub sources: Vec<SourceRate>,
    pub average_rate: f64,
}
