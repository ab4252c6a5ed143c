// ==========================================
// 产能目录 - 班组描述解析器
// ==========================================
// 职责: 将阿拉伯语班组短语解析为有序的班组成员列表
// 规则: 有序规则表，首个命中的规则生效
// 兜底: 无规则命中 → 空班组（不报错，由调用方保留原文）
// ==========================================

use crate::config::catalog_config::RoleTable;
use crate::domain::productivity::CrewMember;
use crate::domain::types::CrewRole;
use crate::importer::text_normalizer::normalize_text;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// ==========================================
// 固定词表
// ==========================================
const GENERAL_WORKER: &str = "عامل";
const ASSISTANT: &str = "مساعد";
const PLUMBER_AND: &str = "صناعيى و";
const CRAFTSMAN_AND_ASSISTANT: &str = "صناعيى ومساعد";
const ELECTRICIAN_AND: &str = "كهربائى و";
const DEMOLITION: &str = "نحات";
const MACHINE: &str = "ماكينة";
const WORK_GROUP: &str = "مجموعة عمل";

// 成员描述（保留原始语言）
const LABEL_CRAFTSMAN: &str = "صناعي";
const LABEL_ELECTRICIAN: &str = "كهربائي";
const LABEL_CARPENTER: &str = "نجار";

/// "مجموعة عمل" 固定按 3 名普工计
pub const WORK_GROUP_SIZE: u32 = 3;

static ASSISTANT_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*مساعد").expect("assistant count pattern"));
static WORKER_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*عامل").expect("worker count pattern"));
static CARPENTER_PLUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"نجار\s*\+").expect("carpenter pattern"));
static DEMOLITION_PLUS_WORKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"نحات\s*\+\s*عامل").expect("demolition helper pattern"));
static COUNTED_DEMOLITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)نحات$").expect("counted demolition pattern"));
static COUNTED_WORKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)عامل$").expect("counted workers pattern"));

// ==========================================
// 数字提取
// ==========================================

/// 单个数字字符的值（ASCII / 阿拉伯-印度数字 / 扩展阿拉伯-印度数字）
fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '\u{0660}'..='\u{0669}' => Some(c as u32 - 0x0660),
        '\u{06F0}'..='\u{06F9}' => Some(c as u32 - 0x06F0),
        _ => None,
    }
}

/// 单项人数上限，超出视为缺失
pub const MAX_CREW_COUNT: u32 = 9_999;

/// 解析人数；0、超过上限或无法识别的数字均视为缺失
pub fn parse_count(digits: &str) -> Option<u32> {
    let mut value: u32 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let d = digit_value(c)?;
        value = value.checked_mul(10)?.checked_add(d)?;
        seen = true;
    }
    if seen && value > 0 && value <= MAX_CREW_COUNT {
        Some(value)
    } else {
        None
    }
}

/// 自左向右第一个命中的数量
fn first_count(pattern: &Regex, haystack: &str) -> Option<u32> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_count(m.as_str()))
}

/// 去除全部空白
fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn member(roles: &RoleTable, role: CrewRole, quantity: u32, label: &str) -> CrewMember {
    CrewMember::new(roles.code(role), quantity, label, role.kind())
}

/// 短语之后的文本（未出现时为空串）
fn after<'a>(text: &'a str, needle: &str) -> &'a str {
    text.find(needle)
        .map(|idx| &text[idx + needle.len()..])
        .unwrap_or("")
}

// ==========================================
// CrewRule - 单条解析规则
// ==========================================
#[derive(Clone, Copy)]
pub struct CrewRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub extract: fn(&str, &RoleTable) -> Vec<CrewMember>,
}

impl fmt::Debug for CrewRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrewRule").field("name", &self.name).finish()
    }
}

impl CrewRule {
    pub fn apply(&self, text: &str, roles: &RoleTable) -> Option<Vec<CrewMember>> {
        if (self.matches)(text) {
            Some((self.extract)(text, roles))
        } else {
            None
        }
    }
}

/// "صناعيى ومساعد"：整句精确匹配（单数、无人数；复数 "مساعدين" 不算）
fn is_craftsman_and_assistant(text: &str) -> bool {
    text.trim() == CRAFTSMAN_AND_ASSISTANT
}

fn plumber_with_assistants(text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    let mut crew = vec![member(roles, CrewRole::Plumber, 1, LABEL_CRAFTSMAN)];
    if let Some(count) = first_count(&ASSISTANT_COUNT, after(text, PLUMBER_AND)) {
        crew.push(member(roles, CrewRole::PlumberAssistant, count, ASSISTANT));
    }
    crew
}

fn electrician_with_assistants(text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    let mut crew = vec![member(roles, CrewRole::Electrician, 1, LABEL_ELECTRICIAN)];
    if let Some(count) = first_count(&ASSISTANT_COUNT, after(text, ELECTRICIAN_AND)) {
        crew.push(member(roles, CrewRole::ElectricianAssistant, count, ASSISTANT));
    }
    crew
}

fn craftsman_and_assistant(_text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    vec![
        member(roles, CrewRole::Craftsman, 1, LABEL_CRAFTSMAN),
        member(roles, CrewRole::GeneralWorker, 1, ASSISTANT),
    ]
}

fn carpenter_plus_workers(text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    let mut crew = vec![member(roles, CrewRole::FormworkCarpenter, 1, LABEL_CARPENTER)];
    let rest = CARPENTER_PLUS
        .find(text)
        .map(|m| &text[m.end()..])
        .unwrap_or("");
    if let Some(count) = first_count(&WORKER_COUNT, rest) {
        crew.push(member(roles, CrewRole::GeneralWorker, count, GENERAL_WORKER));
    }
    crew
}

fn demolition_plus_helper(_text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    vec![
        member(roles, CrewRole::DemolitionWorker, 1, DEMOLITION),
        member(roles, CrewRole::GeneralWorker, 1, GENERAL_WORKER),
    ]
}

fn counted_demolition(text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    let count = first_count(&COUNTED_DEMOLITION, &compact(text)).unwrap_or(1);
    vec![member(roles, CrewRole::DemolitionWorker, count, DEMOLITION)]
}

fn bare_demolition(_text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    vec![member(roles, CrewRole::DemolitionWorker, 1, DEMOLITION)]
}

fn machine_plus_worker(_text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    vec![
        member(roles, CrewRole::Compressor, 1, MACHINE),
        member(roles, CrewRole::GeneralWorker, 1, GENERAL_WORKER),
    ]
}

fn work_group(_text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    vec![member(roles, CrewRole::GeneralWorker, WORK_GROUP_SIZE, WORK_GROUP)]
}

fn counted_workers(text: &str, roles: &RoleTable) -> Vec<CrewMember> {
    let count = first_count(&COUNTED_WORKERS, &compact(text)).unwrap_or(1);
    vec![member(roles, CrewRole::GeneralWorker, count, GENERAL_WORKER)]
}

/// 默认规则表（优先级自上而下）
pub fn default_rules() -> Vec<CrewRule> {
    vec![
        CrewRule {
            name: "plumber-with-assistants",
            matches: |t| t.contains(PLUMBER_AND) && !is_craftsman_and_assistant(t),
            extract: plumber_with_assistants,
        },
        CrewRule {
            name: "electrician-with-assistants",
            matches: |t| t.contains(ELECTRICIAN_AND),
            extract: electrician_with_assistants,
        },
        CrewRule {
            name: "craftsman-and-assistant",
            matches: is_craftsman_and_assistant,
            extract: craftsman_and_assistant,
        },
        CrewRule {
            name: "carpenter-plus-workers",
            matches: |t| CARPENTER_PLUS.is_match(t),
            extract: carpenter_plus_workers,
        },
        CrewRule {
            name: "demolition-plus-helper",
            matches: |t| DEMOLITION_PLUS_WORKER.is_match(t),
            extract: demolition_plus_helper,
        },
        CrewRule {
            name: "counted-demolition",
            matches: |t| COUNTED_DEMOLITION.is_match(&compact(t)),
            extract: counted_demolition,
        },
        CrewRule {
            name: "bare-demolition",
            matches: |t| t == DEMOLITION,
            extract: bare_demolition,
        },
        CrewRule {
            name: "machine-plus-worker",
            matches: |t| t.contains(MACHINE),
            extract: machine_plus_worker,
        },
        CrewRule {
            name: "work-group",
            matches: |t| t.contains(WORK_GROUP),
            extract: work_group,
        },
        CrewRule {
            name: "counted-workers",
            matches: |t| COUNTED_WORKERS.is_match(&compact(t)),
            extract: counted_workers,
        },
    ]
}

// ==========================================
// 解析结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrewMatch {
    /// 空文本
    Empty,
    /// 命中的规则名
    Rule(&'static str),
    /// 非空但无规则命中
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrewParse {
    pub text: String, // 规范化后的原文
    pub outcome: CrewMatch,
    pub members: Vec<CrewMember>,
}

// ==========================================
// CrewParser - 班组解析器
// ==========================================
#[derive(Debug, Clone)]
pub struct CrewParser {
    roles: RoleTable,
    rules: Vec<CrewRule>,
}

impl Default for CrewParser {
    fn default() -> Self {
        Self::new(RoleTable::default())
    }
}

impl CrewParser {
    pub fn new(roles: RoleTable) -> Self {
        Self::with_rules(roles, default_rules())
    }

    /// 使用自定义规则表（测试或扩展新短语）
    pub fn with_rules(roles: RoleTable, rules: Vec<CrewRule>) -> Self {
        Self { roles, rules }
    }

    pub fn rules(&self) -> &[CrewRule] {
        &self.rules
    }

    /// 解析并返回命中信息
    pub fn classify(&self, raw: &str) -> CrewParse {
        let text = normalize_text(raw);
        if text.is_empty() {
            return CrewParse {
                text,
                outcome: CrewMatch::Empty,
                members: Vec::new(),
            };
        }

        for rule in &self.rules {
            if let Some(members) = rule.apply(&text, &self.roles) {
                return CrewParse {
                    text,
                    outcome: CrewMatch::Rule(rule.name),
                    members,
                };
            }
        }

        CrewParse {
            text,
            outcome: CrewMatch::Unrecognized,
            members: Vec::new(),
        }
    }

    /// 仅返回班组成员
    pub fn parse(&self, raw: &str) -> Vec<CrewMember> {
        self.classify(raw).members
    }
}
