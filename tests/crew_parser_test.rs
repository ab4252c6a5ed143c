// ==========================================
// 班组描述解析 集成测试
// ==========================================
// 测试目标: 固定短语 → 班组成员 / 班组人数
// ==========================================

use productivity_catalog::config::RoleTable;
use productivity_catalog::domain::{crew_size, CrewRole, ResourceKind};
use productivity_catalog::importer::{CrewMatch, CrewParser};

fn roles_and_counts(parser: &CrewParser, text: &str) -> Vec<(String, u32)> {
    parser
        .parse(text)
        .into_iter()
        .map(|m| (m.role_code, m.quantity))
        .collect()
}

#[test]
fn test_counted_general_workers() {
    let parser = CrewParser::default();
    let crew = parser.parse("2 عامل");
    assert_eq!(
        roles_and_counts(&parser, "2 عامل"),
        vec![("LAB-GENERAL".to_string(), 2)]
    );
    assert_eq!(crew_size(&crew), 2);
}

#[test]
fn test_carpenter_plus_workers() {
    let parser = CrewParser::default();
    let crew = parser.parse("نجار + 3 عامل");
    assert_eq!(
        roles_and_counts(&parser, "نجار + 3 عامل"),
        vec![
            ("LAB-CARPENTER-FW".to_string(), 1),
            ("LAB-GENERAL".to_string(), 3),
        ]
    );
    assert_eq!(crew_size(&crew), 4);
}

#[test]
fn test_empty_text() {
    let parser = CrewParser::default();
    let parse = parser.classify("");
    assert_eq!(parse.outcome, CrewMatch::Empty);
    assert!(parse.members.is_empty());
    assert_eq!(crew_size(&parse.members), 1);
}

#[test]
fn test_bare_demolition() {
    let parser = CrewParser::default();
    let crew = parser.parse("نحات");
    assert_eq!(
        roles_and_counts(&parser, "نحات"),
        vec![("LAB-DEMOLITION".to_string(), 1)]
    );
    assert_eq!(crew_size(&crew), 1);
}

#[test]
fn test_machine_is_equipment() {
    let parser = CrewParser::default();
    let crew = parser.parse("ماكينة + عامل");
    assert_eq!(crew.len(), 2);
    assert_eq!(crew[0].kind, ResourceKind::Equipment);
    assert_eq!(crew[1].kind, ResourceKind::Labor);
    assert_eq!(crew_size(&crew), 2);
}

#[test]
fn test_parsing_is_deterministic() {
    let parser = CrewParser::default();
    let inputs = [
        "2 عامل",
        "نجار + 3 عامل",
        "صناعيى و 2 مساعد",
        "كهربائى و 3 مساعد",
        "صناعيى ومساعد",
        "نحات + عامل",
        "2 نحات",
        "مجموعة عمل",
        "غير معروف",
    ];
    for input in inputs {
        assert_eq!(parser.parse(input), parser.parse(input), "input: {input}");
    }
}

#[test]
fn test_crew_size_matches_member_sum() {
    let parser = CrewParser::default();
    for input in ["صناعيى و 2 مساعد", "كهربائى و 3 مساعد", "مجموعة عمل", "4 عامل"] {
        let crew = parser.parse(input);
        let sum: u32 = crew.iter().map(|m| m.quantity).sum();
        assert!(!crew.is_empty(), "input: {input}");
        assert_eq!(crew_size(&crew), sum, "input: {input}");
    }
}

#[test]
fn test_injected_role_table() {
    let roles = RoleTable::default().with_code(CrewRole::GeneralWorker, "LAB-HELPER");
    let parser = CrewParser::new(roles);
    assert_eq!(
        roles_and_counts(&parser, "3 عامل"),
        vec![("LAB-HELPER".to_string(), 3)]
    );
}

#[test]
fn test_unrecognized_text_yields_empty_crew() {
    let parser = CrewParser::default();
    let parse = parser.classify(" \u{200F}فني تكييف ");
    assert_eq!(parse.outcome, CrewMatch::Unrecognized);
    assert_eq!(parse.text, "فني تكييف");
    assert!(parse.members.is_empty());
}
