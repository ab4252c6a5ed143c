// ==========================================
// 产能目录 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod catalog_file;
pub mod catalog_repo;
pub mod error;

// 重导出核心仓储
pub use catalog_file::{read_catalog_file, write_catalog_file};
pub use catalog_repo::CatalogRepository;
pub use error::{RepositoryError, RepositoryResult};
