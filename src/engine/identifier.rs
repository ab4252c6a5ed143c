// ==========================================
// 产能目录 - 标识分配器
// ==========================================
// 规则: (类别, 类别内序号) → {prefix}{sep}{seq:0width}
// 红线: 纯函数、确定性；序号从 1 开始，按输入顺序递增
// 限制: 标识取决于位置而非内容，前序行增删会使后续编号平移
// ==========================================

use crate::config::catalog_config::CatalogConfig;
use serde::{Deserialize, Serialize};

/// 分配结果（序号随标识一并暴露，便于下游检测漂移）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedIdentifier {
    pub id: String,
    pub code: String,
    pub sequence: u32,
}

pub struct IdentifierAssigner<'a> {
    config: &'a CatalogConfig,
}

impl<'a> IdentifierAssigner<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self { config }
    }

    pub fn assign(&self, category: &str, sequence: u32) -> AssignedIdentifier {
        AssignedIdentifier {
            id: self.format(self.config.id_prefix(category), sequence),
            code: self.format(self.config.code_prefix(category), sequence),
            sequence,
        }
    }

    fn format(&self, prefix: &str, sequence: u32) -> String {
        format!(
            "{}{}{:0width$}",
            prefix,
            self.config.separator,
            sequence,
            width = self.config.sequence_width
        )
    }
}
