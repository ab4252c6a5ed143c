// ==========================================
// 产能目录 - 引擎层
// ==========================================
// 职责: 编号分配 / 目录构建 / 多来源对比
// 红线: 引擎不拼 SQL，不做文件 I/O
// ==========================================

pub mod catalog_builder;
pub mod identifier;
pub mod multi_source;

// 重导出核心引擎
pub use catalog_builder::{CatalogBuild, CatalogBuildReport, CatalogBuilder, UnparsedCrew};
pub use identifier::{AssignedIdentifier, IdentifierAssigner};
pub use multi_source::MultiSourceAggregator;
