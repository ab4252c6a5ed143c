// ==========================================
// 产能目录 - 字段映射器实现
// ==========================================
// 职责: 源列 → RawProductivityRecord 字段 + 类型转换
// 类别: 优先取类别列，否则按工作表名查配置表
// ==========================================

use crate::config::catalog_config::CatalogConfig;
use crate::domain::productivity::RawProductivityRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FieldMapper, RawRow};
use crate::importer::text_normalizer::normalize_text;
use std::collections::BTreeMap;

// 列名别名（按优先级）
const CATEGORY: &[&str] = &["category", "categoryId", "الفئة"];
const DESCRIPTION: &[&str] = &["description", "البند", "الوصف"];
const DESCRIPTION_EN: &[&str] = &["description_en", "descriptionEn", "nameEn"];
const UNIT: &[&str] = &["unit", "الوحدة"];
const RATE: &[&str] = &["productivity", "productivityRate", "الانتاجية"];
const CREW: &[&str] = &["crew", "crewText", "الطاقم"];
const SOURCE: &[&str] = &["sheet", "source", "المصدر"];
const NOTE: &[&str] = &["note", "notes", "ملاحظات"];

pub struct ProductivityFieldMapper {
    sheet_categories: BTreeMap<String, String>,
}

impl ProductivityFieldMapper {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            sheet_categories: config.sheet_categories.clone(),
        }
    }

    /// 取首个非空别名列的值
    fn get_string(&self, row: &RawRow, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|alias| {
            row.get(*alias)
                .map(|v| normalize_text(v))
                .filter(|v| !v.is_empty())
        })
    }

    fn required(&self, row: &RawRow, aliases: &[&str], row_number: usize) -> ImportResult<String> {
        self.get_string(row, aliases)
            .ok_or_else(|| ImportError::FieldMappingError {
                row: row_number,
                message: format!("缺少必填列: {}", aliases.join(" / ")),
            })
    }

    /// 解析产能值（缺失 → None；非数字 → 类型转换错误）
    fn parse_rate(&self, row: &RawRow, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, RATE) {
            None => Ok(None),
            Some(value) => to_ascii_digits(&value)
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ImportError::TypeConversionError {
                    row: row_number,
                    field: "productivity".to_string(),
                    message: format!("无法解析为浮点数: {}", value),
                }),
        }
    }
}

impl FieldMapper for ProductivityFieldMapper {
    fn map_to_raw_record(&self, row: &RawRow, row_number: usize) -> ImportResult<RawProductivityRecord> {
        let source = self.required(row, SOURCE, row_number)?;

        let category = match self.get_string(row, CATEGORY) {
            Some(category) => category,
            None => self
                .sheet_categories
                .get(&source)
                .cloned()
                .ok_or_else(|| ImportError::FieldMappingError {
                    row: row_number,
                    message: format!("无类别列且工作表未映射: {}", source),
                })?,
        };

        Ok(RawProductivityRecord {
            category,
            description: self.required(row, DESCRIPTION, row_number)?,
            description_en: self.get_string(row, DESCRIPTION_EN),
            unit: self.get_string(row, UNIT).unwrap_or_default(),
            productivity_rate: self.parse_rate(row, row_number)?,
            crew_text: self.get_string(row, CREW).unwrap_or_default(),
            source,
            note: self.get_string(row, NOTE),
        })
    }
}

/// 阿拉伯-印度数字与阿拉伯小数点 → ASCII
fn to_ascii_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{066B}' => '.',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_english_columns() {
        let mapper = ProductivityFieldMapper::new(&CatalogConfig::default());
        let record = mapper
            .map_to_raw_record(
                &row(&[
                    ("category", "electrical"),
                    ("description", " تمديد مواسير "),
                    ("unit", "م.ط"),
                    ("productivity", "50"),
                    ("crew", "كهربائى و 2 مساعد"),
                    ("sheet", "اعمال الكهرباء"),
                    ("note", ""),
                ]),
                1,
            )
            .unwrap();

        assert_eq!(record.category, "electrical");
        assert_eq!(record.description, "تمديد مواسير");
        assert_eq!(record.productivity_rate, Some(50.0));
        assert_eq!(record.source, "اعمال الكهرباء");
        assert_eq!(record.note, None);
    }

    #[test]
    fn test_category_from_sheet() {
        let mapper = ProductivityFieldMapper::new(&CatalogConfig::default());
        let record = mapper
            .map_to_raw_record(
                &row(&[
                    ("البند", "شدة خشبية"),
                    ("الوحدة", "م2"),
                    ("الانتاجية", "١٢٫٥"),
                    ("الطاقم", "نجار + 3 عامل"),
                    ("sheet", "اعمال الخشب"),
                ]),
                4,
            )
            .unwrap();

        assert_eq!(record.category, "carpentry");
        assert_eq!(record.productivity_rate, Some(12.5));
        assert_eq!(record.crew_text, "نجار + 3 عامل");
    }

    #[test]
    fn test_missing_rate_is_carried_as_none() {
        let mapper = ProductivityFieldMapper::new(&CatalogConfig::default());
        let record = mapper
            .map_to_raw_record(
                &row(&[("category", "landscape"), ("description", "نجيل"), ("sheet", "x")]),
                2,
            )
            .unwrap();
        assert_eq!(record.productivity_rate, None);
        assert_eq!(record.crew_text, "");
    }

    #[test]
    fn test_non_numeric_rate() {
        let mapper = ProductivityFieldMapper::new(&CatalogConfig::default());
        let err = mapper
            .map_to_raw_record(
                &row(&[
                    ("category", "landscape"),
                    ("description", "نجيل"),
                    ("productivity", "حسب الموقع"),
                    ("sheet", "x"),
                ]),
                7,
            )
            .unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 7, .. }));
    }

    #[test]
    fn test_unmapped_sheet_without_category() {
        let mapper = ProductivityFieldMapper::new(&CatalogConfig::default());
        let err = mapper
            .map_to_raw_record(
                &row(&[("description", "دهان"), ("productivity", "100"), ("sheet", "اعمال الدهان")]),
                3,
            )
            .unwrap_err();
        assert!(matches!(err, ImportError::FieldMappingError { row: 3, .. }));
    }
}
