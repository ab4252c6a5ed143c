// ==========================================
// 产能目录 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls，全部工作表) / CSV (.csv) / JSON (.json)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawRow};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// 工作表名注入列（文件中无来源列时）
pub const SHEET_COLUMN: &str = "sheet";

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn is_blank(row: &RawRow) -> bool {
    row.values().all(|v| v.trim().is_empty())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        // 检查扩展名（无扩展名的临时文件放行）
        let ext = extension_of(file_path);
        if !ext.is_empty() && ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if is_blank(&row_map) {
                continue;
            }
            rows.push(row_map);
        }

        debug!(path = %file_path.display(), rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 每个工作表第一行为表头；工作表名写入 `sheet` 列（表内已有则保留）
pub struct ExcelParser;

impl ExcelParser {
    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            other => other.to_string().trim().to_string(),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        let mut rows = Vec::new();
        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name)?;

            let mut sheet_rows = range.rows();
            let Some(header_row) = sheet_rows.next() else {
                debug!(sheet = %sheet_name, "空工作表，跳过");
                continue;
            };
            let headers: Vec<String> = header_row.iter().map(Self::cell_text).collect();

            let mut count = 0usize;
            for data_row in sheet_rows {
                let mut row_map = HashMap::new();
                for (col_idx, cell) in data_row.iter().enumerate() {
                    if let Some(header) = headers.get(col_idx) {
                        if !header.is_empty() {
                            row_map.insert(header.clone(), Self::cell_text(cell));
                        }
                    }
                }

                if is_blank(&row_map) {
                    continue;
                }
                row_map
                    .entry(SHEET_COLUMN.to_string())
                    .or_insert_with(|| sheet_name.clone());
                rows.push(row_map);
                count += 1;
            }
            debug!(sheet = %sheet_name, rows = count, "工作表解析完成");
        }

        info!(path = %file_path.display(), rows = rows.len(), "Excel 解析完成");
        Ok(rows)
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
// 格式: 对象数组（抽取脚本输出），标量值转为文本，null 视为空
pub struct JsonParser;

impl JsonParser {
    fn value_text(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        }
    }
}

impl FileParser for JsonParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let reader = BufReader::new(File::open(file_path)?);
        let document: Value = serde_json::from_reader(reader)?;
        let Value::Array(items) = document else {
            return Err(ImportError::JsonParseError(
                "顶层必须为对象数组".to_string(),
            ));
        };

        let mut rows = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let Value::Object(fields) = item else {
                return Err(ImportError::FieldMappingError {
                    row: idx + 1,
                    message: "数组元素必须为对象".to_string(),
                });
            };
            let row_map: RawRow = fields
                .iter()
                .map(|(k, v)| (k.trim().to_string(), Self::value_text(v)))
                .collect();
            if is_blank(&row_map) {
                continue;
            }
            rows.push(row_map);
        }

        debug!(path = %file_path.display(), rows = rows.len(), "JSON 解析完成");
        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_rows(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_rows(path),
            "json" => JsonParser.parse_to_raw_rows(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        self.parse(file_path)
    }
}
