// ==========================================
// 产能目录 - 目录导入器
// ==========================================
// 职责: 整合导入流程，从文件到目录
// 流程: 解析 → 映射 → 构建 → (可选) 落库
// 红线: 任一记录硬失败则整批失败，不产出部分目录
// ==========================================

use crate::config::catalog_config::CatalogConfig;
use crate::domain::catalog::{Catalog, CatalogExport};
use crate::domain::productivity::RawProductivityRecord;
use crate::engine::catalog_builder::{CatalogBuildReport, CatalogBuilder};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::ProductivityFieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{FieldMapper, FileParser};
use crate::repository::catalog_repo::CatalogRepository;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

/// 一次导入运行的结果
#[derive(Debug, Clone)]
pub struct CatalogImportResult {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub catalog: Catalog,
    pub report: CatalogBuildReport,
    pub persisted: bool,
}

impl CatalogImportResult {
    pub fn to_export(&self) -> CatalogExport {
        CatalogExport::from_catalog(&self.catalog, Some(self.run_id.clone()), self.finished_at)
    }
}

// ==========================================
// CatalogImporter - 目录导入器
// ==========================================
pub struct CatalogImporter {
    config: CatalogConfig,
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    repository: Option<CatalogRepository>,
}

impl CatalogImporter {
    /// 使用默认组件（按扩展名解析 + 别名映射）
    pub fn new(config: CatalogConfig) -> Self {
        let field_mapper = Box::new(ProductivityFieldMapper::new(&config));
        Self {
            config,
            file_parser: Box::new(UniversalFileParser),
            field_mapper,
            repository: None,
        }
    }

    /// 注入自定义组件
    pub fn with_components(
        config: CatalogConfig,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            config,
            file_parser,
            field_mapper,
            repository: None,
        }
    }

    /// 构建完成后整体替换到 SQLite
    pub fn with_repository(mut self, repository: CatalogRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// 从文件导入
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<CatalogImportResult> {
        let started = Instant::now();
        let started_at = Utc::now();

        // === 阶段 0: 文件解析 ===
        let rows = self.file_parser.parse_to_raw_rows(file_path.as_ref())?;
        info!(total_rows = rows.len(), "文件解析完成");

        // === 阶段 1: 字段映射 ===
        let records = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.field_mapper.map_to_raw_record(row, idx + 1))
            .collect::<ImportResult<Vec<_>>>()?;

        self.run(records, started, started_at)
    }

    /// 从已映射的记录导入
    pub fn import_records(&self, records: Vec<RawProductivityRecord>) -> ImportResult<CatalogImportResult> {
        self.run(records, Instant::now(), Utc::now())
    }

    fn run(
        &self,
        records: Vec<RawProductivityRecord>,
        started: Instant,
        started_at: DateTime<Utc>,
    ) -> ImportResult<CatalogImportResult> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, records = records.len(), "开始生成产能目录");

        // === 阶段 2: 目录构建 ===
        let build = CatalogBuilder::new(&self.config).build(&records)?;

        // === 阶段 3: 落库（可选）===
        let persisted = match &self.repository {
            Some(repository) => {
                repository.replace_catalog(&build.catalog, Some(&run_id))?;
                true
            }
            None => false,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            total = build.catalog.total(),
            active = build.catalog.active_count(),
            unparsed_crew = build.report.unparsed_crew.len(),
            persisted = persisted,
            elapsed_ms = elapsed_ms,
            "产能目录生成完成"
        );

        Ok(CatalogImportResult {
            run_id,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms,
            catalog: build.catalog,
            report: build.report,
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;
    use std::io::Write;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_import_csv_file() {
        let file = csv_file(&[
            "category,description,unit,productivity,crew,sheet",
            "electrical,تمديد,م.ط,50,كهربائى و 2 مساعد,اعمال الكهرباء",
            "electrical,تركيب,عدد,20,,اعمال الكهرباء",
        ]);

        let result = CatalogImporter::new(CatalogConfig::default())
            .import_file(file.path())
            .unwrap();

        assert_eq!(result.catalog.total(), 2);
        assert!(!result.persisted);
        assert_eq!(result.catalog.get_by_code("ELEC-001").unwrap().crew_size, 3);
        assert!(Uuid::parse_str(&result.run_id).is_ok());

        let export = result.to_export();
        assert_eq!(export.run_id.as_deref(), Some(result.run_id.as_str()));
        assert_eq!(export.active, 2);
    }

    #[test]
    fn test_import_fails_on_missing_rate() {
        let file = csv_file(&[
            "category,description,unit,productivity,crew,sheet",
            "landscape,زراعة,م2,30,,اعمال الاند اسكيب",
            "landscape,نجيل,م2,,,اعمال الاند اسكيب",
        ]);

        let err = CatalogImporter::new(CatalogConfig::default())
            .import_file(file.path())
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingProductivityRate { row: 2, .. }));
    }

    #[test]
    fn test_import_persists_when_repository_present() {
        let repository = CatalogRepository::new(":memory:").unwrap();
        let importer = CatalogImporter::new(CatalogConfig::default()).with_repository(repository);

        let result = importer
            .import_records(vec![RawProductivityRecord {
                category: "elevator".to_string(),
                description: "تركيب مصعد".to_string(),
                description_en: None,
                unit: "عدد".to_string(),
                productivity_rate: Some(0.5),
                crew_text: String::new(),
                source: "اعمال الاسانسير".to_string(),
                note: None,
            }])
            .unwrap();

        assert!(result.persisted);
        let stored = importer.repository.as_ref().unwrap().count().unwrap();
        assert_eq!(stored, 1);
    }
}
