// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、原始记录构造、CSV 夹具
// ==========================================

#![allow(dead_code)]

use productivity_catalog::domain::RawProductivityRecord;
use std::io::Write;
use tempfile::NamedTempFile;

/// 创建临时测试数据库路径
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    (temp_file, db_path)
}

/// 原始记录构造器
pub struct RecordBuilder {
    record: RawProductivityRecord,
}

impl RecordBuilder {
    pub fn new(category: &str, description: &str) -> Self {
        Self {
            record: RawProductivityRecord {
                category: category.to_string(),
                description: description.to_string(),
                description_en: None,
                unit: "م2".to_string(),
                productivity_rate: Some(10.0),
                crew_text: String::new(),
                source: "بتروجت".to_string(),
                note: None,
            },
        }
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.record.productivity_rate = Some(rate);
        self
    }

    pub fn no_rate(mut self) -> Self {
        self.record.productivity_rate = None;
        self
    }

    pub fn crew(mut self, crew: &str) -> Self {
        self.record.crew_text = crew.to_string();
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.record.unit = unit.to_string();
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.record.source = source.to_string();
        self
    }

    pub fn english(mut self, name: &str) -> Self {
        self.record.description_en = Some(name.to_string());
        self
    }

    pub fn build(self) -> RawProductivityRecord {
        self.record
    }
}

/// 写出临时 CSV（带 .csv 后缀）
pub fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}
