// ==========================================
// 产能目录 - 目录配置（只读查找表）
// ==========================================
// 职责: 类别→编号前缀、工种→资源编码、工作表→类别
// 红线: 以参数注入构建器，不使用全局状态
// ==========================================

use crate::domain::types::{categories, CrewRole};
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 未识别类别的通用前缀
pub const DEFAULT_FALLBACK_PREFIX: &str = "GEN";

/// 序号最小位数（零填充）
pub const DEFAULT_SEQUENCE_WIDTH: usize = 3;

/// 标识符分隔符
pub const DEFAULT_SEPARATOR: &str = "-";

// ==========================================
// RoleTable - 工种资源编码表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RoleTable {
    codes: BTreeMap<CrewRole, String>,
}

impl RoleTable {
    /// 资源编码（未覆写时使用默认编码）
    pub fn code(&self, role: CrewRole) -> &str {
        self.codes
            .get(&role)
            .map(String::as_str)
            .unwrap_or_else(|| role.default_code())
    }

    pub fn set_code(&mut self, role: CrewRole, code: impl Into<String>) {
        self.codes.insert(role, code.into());
    }

    pub fn with_code(mut self, role: CrewRole, code: impl Into<String>) -> Self {
        self.set_code(role, code);
        self
    }
}

// ==========================================
// CatalogConfig - 目录配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub id_prefixes: BTreeMap<String, String>,
    pub code_prefixes: BTreeMap<String, String>,
    pub fallback_prefix: String,
    pub sequence_width: usize,
    pub separator: String,
    pub roles: RoleTable,
    pub sheet_categories: BTreeMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let table = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };

        Self {
            id_prefixes: table(&[
                (categories::SITE_SERVICES, "SVC"),
                (categories::PIPE_INSTALLATION, "PIP"),
                (categories::ELECTRICAL, "ELE"),
                (categories::STEEL_WORKS, "STL"),
                (categories::METAL_WORKS, "MTL"),
                (categories::CARPENTRY, "CRP"),
                (categories::ALUMINUM, "ALU"),
                (categories::LANDSCAPE, "LND"),
                (categories::ELEVATOR, "ELV"),
            ]),
            code_prefixes: table(&[
                (categories::SITE_SERVICES, "SVC"),
                (categories::PIPE_INSTALLATION, "PIPE"),
                (categories::ELECTRICAL, "ELEC"),
                (categories::STEEL_WORKS, "STEEL"),
                (categories::METAL_WORKS, "METAL"),
                (categories::CARPENTRY, "CARP"),
                (categories::ALUMINUM, "ALUM"),
                (categories::LANDSCAPE, "LAND"),
                (categories::ELEVATOR, "ELEV"),
            ]),
            fallback_prefix: DEFAULT_FALLBACK_PREFIX.to_string(),
            sequence_width: DEFAULT_SEQUENCE_WIDTH,
            separator: DEFAULT_SEPARATOR.to_string(),
            roles: RoleTable::default(),
            sheet_categories: table(&[
                ("اعمال تخديميه", categories::SITE_SERVICES),
                ("تركيب المواسير", categories::PIPE_INSTALLATION),
                ("اعمال الكهرباء", categories::ELECTRICAL),
                ("اعمال الحديد", categories::STEEL_WORKS),
                ("الاعمال المعدنيه", categories::METAL_WORKS),
                ("اعمال الخشب", categories::CARPENTRY),
                ("اعمال الالمونيوم", categories::ALUMINUM),
                ("اعمال الاند اسكيب", categories::LANDSCAPE),
                ("اعمال الاسانسير", categories::ELEVATOR),
            ]),
        }
    }
}

impl CatalogConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: CatalogConfig =
            serde_json::from_str(&raw).map_err(|e| ImportError::ConfigReadError {
                key: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置值
    pub fn validate(&self) -> ImportResult<()> {
        if self.sequence_width == 0 {
            return Err(ImportError::ConfigValueError {
                key: "sequence_width".to_string(),
                value: "0".to_string(),
                message: "序号位数必须大于 0".to_string(),
            });
        }
        if self.separator.is_empty() {
            return Err(ImportError::ConfigValueError {
                key: "separator".to_string(),
                value: String::new(),
                message: "分隔符不能为空".to_string(),
            });
        }
        if self.fallback_prefix.trim().is_empty() {
            return Err(ImportError::ConfigValueError {
                key: "fallback_prefix".to_string(),
                value: self.fallback_prefix.clone(),
                message: "通用前缀不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// id 前缀（未识别类别回落到通用前缀）
    pub fn id_prefix(&self, category: &str) -> &str {
        self.id_prefixes
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.fallback_prefix)
    }

    /// code 前缀（未识别类别回落到通用前缀）
    pub fn code_prefix(&self, category: &str) -> &str {
        self.code_prefixes
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.fallback_prefix)
    }

    /// 工作表名 → 类别
    pub fn category_for_sheet(&self, sheet: &str) -> Option<&str> {
        self.sheet_categories.get(sheet).map(String::as_str)
    }
}
