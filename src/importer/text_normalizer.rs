// ==========================================
// 产能目录 - 文本规范化
// ==========================================
// 职责: 去除双向控制字符（LRM/RLM/嵌入/覆盖/隔离）+ TRIM
// 纯函数，不会失败
// ==========================================

/// 是否为双向文本控制字符
///
/// - U+200E LRM / U+200F RLM
/// - U+202A..U+202E 嵌入与覆盖
/// - U+2066..U+2069 方向隔离
pub fn is_bidi_control(c: char) -> bool {
    matches!(c, '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

/// 规范化文本字段
pub fn normalize_text(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| !is_bidi_control(*c)).collect();
    stripped.trim().to_string()
}

/// 规范化可选文本字段（缺失 → 空串）
pub fn normalize_optional(value: Option<&str>) -> String {
    value.map(normalize_text).unwrap_or_default()
}

/// 规范化后为空则视为缺失
pub fn normalize_null(value: Option<&str>) -> Option<String> {
    let normalized = normalize_optional(value);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
