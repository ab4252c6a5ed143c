// ==========================================
// 产能目录 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod catalog;
pub mod productivity;
pub mod types;

// 重导出核心类型
pub use catalog::{Catalog, CatalogExport};
pub use productivity::{
    crew_size, BoqTemplate, ComponentItem, CrewMember, MultiSourceProductivity,
    ProductivityTemplate, RawProductivityRecord, SourceRate,
};
pub use types::{categories, CrewRole, ResourceKind, KNOWN_SOURCES};
