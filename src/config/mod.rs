// ==========================================
// 产能目录 - 配置层
// ==========================================
// 职责: 目录查找表（默认值 / JSON 文件 / config_kv 覆写）
// ==========================================

pub mod catalog_config;
pub mod config_manager;

// 重导出核心配置
pub use catalog_config::{CatalogConfig, RoleTable};
pub use config_manager::{config_keys, ConfigManager};
