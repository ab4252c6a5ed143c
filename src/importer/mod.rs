// ==========================================
// 产能目录 - 导入层
// ==========================================
// 职责: 外部表格 → RawProductivityRecord → 目录
// 支持: Excel, CSV, JSON
// ==========================================

// 模块声明
pub mod catalog_importer;
pub mod crew_parser;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod text_normalizer;

// 重导出核心类型
pub use catalog_importer::{CatalogImportResult, CatalogImporter};
pub use crew_parser::{CrewMatch, CrewParse, CrewParser, CrewRule};
pub use error::{ImportError, ImportResult};
pub use field_mapper::ProductivityFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, JsonParser, UniversalFileParser};
pub use importer_trait::{FieldMapper, FileParser, RawRow};
pub use text_normalizer::{normalize_null, normalize_text};
