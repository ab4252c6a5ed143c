// ==========================================
// 产能目录 - 核心库
// ==========================================
// 职责: 阿拉伯语施工产能表 → 结构化产能模板目录
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ar");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 编号/构建/对比
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 查找表
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/schema）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{CatalogConfig, ConfigManager, RoleTable};
pub use domain::{
    Catalog, CatalogExport, CrewMember, CrewRole, MultiSourceProductivity, ProductivityTemplate,
    RawProductivityRecord, ResourceKind,
};
pub use engine::{CatalogBuild, CatalogBuildReport, CatalogBuilder, IdentifierAssigner, MultiSourceAggregator};
pub use importer::{CatalogImportResult, CatalogImporter, CrewParser, ImportError, ImportResult};
pub use repository::{CatalogRepository, RepositoryError, RepositoryResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "productivity-catalog";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
