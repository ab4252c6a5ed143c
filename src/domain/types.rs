// ==========================================
// 产能目录 - 领域类型定义
// ==========================================
// 职责: 工种/资源枚举、已知工作类别与来源标签
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 资源类型 (Resource Kind)
// ==========================================
// 班组成员既可能是人工，也可能是机械
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Labor,
    Equipment,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Labor => write!(f, "labor"),
            ResourceKind::Equipment => write!(f, "equipment"),
        }
    }
}

// ==========================================
// 班组工种 (Crew Role)
// ==========================================
// 序列化格式: kebab-case（与配置文件/config_kv 键一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrewRole {
    GeneralWorker,        // عامل
    Plumber,              // صناعي (سباك)
    PlumberAssistant,     // مساعد سباك
    Electrician,          // كهربائي
    ElectricianAssistant, // مساعد كهربائي
    Craftsman,            // صناعي
    FormworkCarpenter,    // نجار مسلح
    DemolitionWorker,     // نحات
    Compressor,           // ماكينة تكسير
}

impl CrewRole {
    /// 全部工种（固定顺序）
    pub const ALL: [CrewRole; 9] = [
        CrewRole::GeneralWorker,
        CrewRole::Plumber,
        CrewRole::PlumberAssistant,
        CrewRole::Electrician,
        CrewRole::ElectricianAssistant,
        CrewRole::Craftsman,
        CrewRole::FormworkCarpenter,
        CrewRole::DemolitionWorker,
        CrewRole::Compressor,
    ];

    /// 默认资源编码（对齐 crew-roles 费率表）
    pub fn default_code(&self) -> &'static str {
        match self {
            CrewRole::GeneralWorker => "LAB-GENERAL",
            CrewRole::Plumber => "LAB-PLUMBER",
            CrewRole::PlumberAssistant => "LAB-PLUMBER-ASST",
            CrewRole::Electrician => "LAB-ELECTRICIAN",
            CrewRole::ElectricianAssistant => "LAB-ELECTRICIAN-ASST",
            CrewRole::Craftsman => "LAB-CRAFTSMAN",
            CrewRole::FormworkCarpenter => "LAB-CARPENTER-FW",
            CrewRole::DemolitionWorker => "LAB-DEMOLITION",
            CrewRole::Compressor => "EQP-COMPRESSOR",
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            CrewRole::Compressor => ResourceKind::Equipment,
            _ => ResourceKind::Labor,
        }
    }

    /// kebab-case 键名
    pub fn as_key(&self) -> &'static str {
        match self {
            CrewRole::GeneralWorker => "general-worker",
            CrewRole::Plumber => "plumber",
            CrewRole::PlumberAssistant => "plumber-assistant",
            CrewRole::Electrician => "electrician",
            CrewRole::ElectricianAssistant => "electrician-assistant",
            CrewRole::Craftsman => "craftsman",
            CrewRole::FormworkCarpenter => "formwork-carpenter",
            CrewRole::DemolitionWorker => "demolition-worker",
            CrewRole::Compressor => "compressor",
        }
    }
}

impl fmt::Display for CrewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for CrewRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrewRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_key() == s.trim())
            .ok_or_else(|| format!("未知工种: {}", s))
    }
}

// ==========================================
// 已知工作类别 (Category)
// ==========================================
// 类别本身以字符串流转，未知类别不报错（编号时回落到通用前缀）
pub mod categories {
    pub const SITE_SERVICES: &str = "site-services";
    pub const PIPE_INSTALLATION: &str = "pipe-installation";
    pub const ELECTRICAL: &str = "electrical";
    pub const STEEL_WORKS: &str = "steel-works";
    pub const METAL_WORKS: &str = "metal-works";
    pub const CARPENTRY: &str = "carpentry";
    pub const ALUMINUM: &str = "aluminum";
    pub const LANDSCAPE: &str = "landscape";
    pub const ELEVATOR: &str = "elevator";

    pub const ALL: [&str; 9] = [
        SITE_SERVICES,
        PIPE_INSTALLATION,
        ELECTRICAL,
        STEEL_WORKS,
        METAL_WORKS,
        CARPENTRY,
        ALUMINUM,
        LANDSCAPE,
        ELEVATOR,
    ];
}

// ==========================================
// 已知数据来源 (Source)
// ==========================================
// 工作簿的工作表名称 + 外部参考来源
pub const KNOWN_SOURCES: [&str; 14] = [
    "بتروجت",
    "H.A",
    "البقري/النادي",
    "مصادر اخري",
    "متوسط",
    "اعمال تخديميه",
    "تركيب المواسير",
    "اعمال الكهرباء",
    "اعمال الحديد",
    "الاعمال المعدنيه",
    "اعمال الخشب",
    "اعمال الالمونيوم",
    "اعمال الاند اسكيب",
    "اعمال الاسانسير",
];

pub fn is_known_source(source: &str) -> bool {
    KNOWN_SOURCES.contains(&source)
}
