// ==========================================
// 产能目录 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 阶段: 0 文件解析 → 1 字段映射 → 2 目录构建（engine）
// ==========================================

use crate::domain::productivity::RawProductivityRecord;
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

/// 原始行（列名 → 单元格文本）
pub type RawRow = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser, JsonParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过空白行，保持文件顺序）
    /// - Err: 文件不存在、格式错误
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: ProductivityFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行映射为 RawProductivityRecord
    ///
    /// # 参数
    /// - row: 原始行记录
    /// - row_number: 1 基行号（用于错误定位）
    ///
    /// # 返回
    /// - Ok(RawProductivityRecord): 产能值缺失时为 None，由构建器拒绝
    /// - Err: 必填列缺失、产能值非数字
    fn map_to_raw_record(&self, row: &RawRow, row_number: usize)
        -> ImportResult<RawProductivityRecord>;
}
