// ==========================================
// 产能目录 - 目录 JSON 文件
// ==========================================
// 格式: CatalogExport（camelCase，pretty 输出）
// ==========================================

use crate::domain::catalog::CatalogExport;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// 写出目录文件（父目录不存在时创建）
pub fn write_catalog_file<P: AsRef<Path>>(path: P, export: &CatalogExport) -> RepositoryResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, export)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(path = %path.display(), total = export.total, "目录文件已写出");
    Ok(())
}

pub fn read_catalog_file<P: AsRef<Path>>(path: P) -> RepositoryResult<CatalogExport> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RepositoryError::NotFound {
            entity: "catalog_file".to_string(),
            id: path.display().to_string(),
        });
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Catalog;
    use crate::domain::productivity::ProductivityTemplate;
    use chrono::Utc;

    fn template(code: &str) -> ProductivityTemplate {
        ProductivityTemplate {
            id: code.to_string(),
            code: code.to_string(),
            sequence: 1,
            name_ar: "تركيب لوحة".to_string(),
            name_en: None,
            category_id: "electrical".to_string(),
            unit: "عدد".to_string(),
            unit_ar: "عدد".to_string(),
            productivity_rate: 3.0,
            crew_size: 1,
            crew: Vec::new(),
            source: "اعمال الكهرباء".to_string(),
            source_ref: Some("اعمال الكهرباء".to_string()),
            notes: None,
            crew_text: None,
            is_active: true,
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("catalog.json");
        let catalog = Catalog::from_templates(vec![template("ELEC-001"), template("ELEC-002")]);
        let export = CatalogExport::from_catalog(&catalog, Some("run-7".to_string()), Utc::now());

        write_catalog_file(&path, &export).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"productivityRate\""));
        assert!(raw.contains("\"runId\": \"run-7\""));

        let back = read_catalog_file(&path).unwrap();
        assert_eq!(back.total, 2);
        assert_eq!(back.into_catalog().get_by_code("ELEC-002").unwrap().unit, "عدد");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_catalog_file("does/not/exist.json");
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[test]
    fn test_read_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();

        let result = read_catalog_file(&path);
        assert!(matches!(result, Err(RepositoryError::SerializationError(_))));
    }

    #[test]
    fn test_write_under_file_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let export = CatalogExport::from_catalog(&Catalog::default(), None, Utc::now());
        let result = write_catalog_file(blocker.join("catalog.json"), &export);
        assert!(matches!(result, Err(RepositoryError::FileIoError(_))));
    }
}
