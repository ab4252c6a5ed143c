// ==========================================
// 目录生成流程 集成测试
// ==========================================
// 测试目标: 文件 → 映射 → 构建 → 查询 → 导出
// ==========================================

mod test_helpers;

use productivity_catalog::config::CatalogConfig;
use productivity_catalog::domain::{Catalog, CatalogExport};
use productivity_catalog::engine::{CatalogBuilder, MultiSourceAggregator};
use productivity_catalog::importer::{CatalogImporter, ImportError};
use productivity_catalog::logging;
use productivity_catalog::repository::{read_catalog_file, write_catalog_file};
use std::collections::HashSet;
use test_helpers::{write_csv, RecordBuilder};

#[test]
fn test_csv_to_catalog_end_to_end() {
    logging::init_test();

    let file = write_csv(&[
        "category,description,unit,productivity,crew,sheet,note",
        "site-services,تكسير خرسانة,م3,4,ماكينة + عامل,اعمال تخديميه,",
        "electrical,تمديد مواسير,م.ط,50,كهربائى و 2 مساعد,اعمال الكهرباء,",
        "site-services,نقل مخلفات,م3,12,2 عامل,اعمال تخديميه,بالسيارة",
        "carpentry,شدة خشبية,م2,12.5,نجار + 3 عامل,اعمال الخشب,",
        "electrical,تركيب لوحة,عدد,3,,اعمال الكهرباء,",
    ]);

    let result = CatalogImporter::new(CatalogConfig::default())
        .import_file(file.path())
        .unwrap();
    let catalog = &result.catalog;

    // 类别首次出现顺序 + 类别内输入顺序
    let codes: Vec<&str> = catalog.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(
        codes,
        vec!["SVC-001", "SVC-002", "ELEC-001", "ELEC-002", "CARP-001"]
    );

    let svc2 = catalog.get_by_code("SVC-002").unwrap();
    assert_eq!(svc2.name_ar, "نقل مخلفات");
    assert_eq!(svc2.crew_size, 2);
    assert_eq!(svc2.notes.as_deref(), Some("بالسيارة"));

    let panel = catalog.get_by_id("ELE-002").unwrap();
    assert!(panel.crew.is_empty());
    assert_eq!(panel.crew_size, 1);

    assert_eq!(catalog.get_by_code("CARP-001").unwrap().crew_size, 4);
    assert!(catalog.get_by_code("CARP-002").is_none());

    assert_eq!(catalog.by_category("electrical").len(), 2);
    assert_eq!(catalog.by_source("اعمال تخديميه").len(), 2);
    assert_eq!(result.report.empty_crew, 1);
    assert!(!result.report.has_unparsed_crew());
}

#[test]
fn test_identifiers_unique_across_catalog() {
    let records: Vec<_> = (0..30)
        .map(|i| {
            let category = ["electrical", "carpentry", "landscape"][i % 3];
            RecordBuilder::new(category, &format!("بند {}", i))
                .rate(1.0 + i as f64)
                .crew("2 عامل")
                .build()
        })
        .collect();

    let config = CatalogConfig::default();
    let build = CatalogBuilder::new(&config).build(&records).unwrap();

    let ids: HashSet<&str> = build.catalog.iter().map(|t| t.id.as_str()).collect();
    let codes: HashSet<&str> = build.catalog.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(ids.len(), 30);
    assert_eq!(codes.len(), 30);
    assert_eq!(build.catalog.get_by_code("LAND-010").unwrap().name_ar, "بند 29");
}

#[test]
fn test_rerun_is_stable() {
    let records = vec![
        RecordBuilder::new("aluminum", "شباك").crew("صناعيى ومساعد").build(),
        RecordBuilder::new("steel-works", "حديد").crew("مجموعة عمل").build(),
        RecordBuilder::new("aluminum", "باب").crew("2 عامل").build(),
    ];
    let config = CatalogConfig::default();
    let first = CatalogBuilder::new(&config).build(&records).unwrap();
    let second = CatalogBuilder::new(&config).build(&records).unwrap();
    assert_eq!(first.catalog.templates(), second.catalog.templates());
}

#[test]
fn test_missing_rate_names_the_record() {
    let records = vec![
        RecordBuilder::new("elevator", "تركيب مصعد").build(),
        RecordBuilder::new("elevator", "صيانة").no_rate().build(),
    ];
    let config = CatalogConfig::default();
    let err = CatalogBuilder::new(&config).build(&records).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, ImportError::MissingProductivityRate { row: 2, .. }));
    assert!(message.contains("صيانة"));
}

#[test]
fn test_filters_return_active_only() {
    let records = vec![
        RecordBuilder::new("landscape", "زراعة").source("بتروجت").build(),
        RecordBuilder::new("landscape", "نجيل").source("بتروجت").build(),
    ];
    let config = CatalogConfig::default();
    let mut templates = CatalogBuilder::new(&config)
        .build(&records)
        .unwrap()
        .catalog
        .into_templates();
    templates[1].is_active = false;
    let catalog = Catalog::from_templates(templates);

    assert_eq!(catalog.by_category("landscape").len(), 1);
    assert_eq!(catalog.by_source("بتروجت").len(), 1);
    assert!(catalog.by_category("landscape").iter().all(|t| t.is_active));
    // 精确查询不受 active 影响
    assert!(catalog.get_by_code("LAND-002").is_some());
}

#[test]
fn test_multi_source_average() {
    // 12 条同类记录: LAND-010..LAND-012 共享前缀 LAND-01
    let rates = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 20.0, 30.0];
    let sources = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "بتروجت", "المقاولون العرب", "حسن علام"];
    let records: Vec<_> = rates
        .iter()
        .zip(sources.iter())
        .map(|(rate, source)| {
            RecordBuilder::new("landscape", "زراعة نجيل")
                .rate(*rate)
                .source(source)
                .crew("2 عامل")
                .build()
        })
        .collect();

    let config = CatalogConfig::default();
    let catalog = CatalogBuilder::new(&config).build(&records).unwrap().catalog;
    let aggregator = MultiSourceAggregator::new(&catalog, &config.separator);

    let result = aggregator.compare("LAND-01").unwrap();
    assert_eq!(result.average_rate, 20.0);
    assert_eq!(result.code, "LAND-010");
    assert_eq!(result.prefix, "LAND-01");
    let tuples: Vec<(&str, f64, u32)> = result
        .sources
        .iter()
        .map(|s| (s.source.as_str(), s.productivity_rate, s.crew_size))
        .collect();
    assert_eq!(
        tuples,
        vec![
            ("بتروجت", 10.0, 2),
            ("المقاولون العرب", 20.0, 2),
            ("حسن علام", 30.0, 2),
        ]
    );

    assert!(aggregator.compare("ELEC-001").is_none());
}

#[test]
fn test_search_and_boq() {
    let records = vec![
        RecordBuilder::new("site-services", "تكسير خرسانة")
            .english("Concrete Breaking")
            .crew("ماكينة + عامل")
            .build(),
        RecordBuilder::new("site-services", "نقل مخلفات").build(),
    ];
    let config = CatalogConfig::default();
    let catalog = CatalogBuilder::new(&config).build(&records).unwrap().catalog;

    assert_eq!(catalog.search("خرسانة").len(), 1);
    assert_eq!(catalog.search("concrete").len(), 1);
    assert!(catalog.search("  ").is_empty());

    let boq = catalog.get_by_code("SVC-001").unwrap().to_boq_template();
    assert_eq!(boq.labor.len(), 1);
    assert_eq!(boq.equipment.len(), 1);
    assert_eq!(boq.equipment[0].rate_code, "EQP-COMPRESSOR");
    assert!(boq.materials.is_empty());
}

#[test]
fn test_export_file_round_trip() {
    let records = vec![
        RecordBuilder::new("metal-works", "درابزين").crew("2 عامل").build(),
        RecordBuilder::new("pipe-installation", "مواسير").crew("صناعيى و 2 مساعد").build(),
    ];
    let config = CatalogConfig::default();
    let catalog = CatalogBuilder::new(&config).build(&records).unwrap().catalog;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let export = CatalogExport::from_catalog(&catalog, None, chrono::Utc::now());
    write_catalog_file(&path, &export).unwrap();

    let loaded = read_catalog_file(&path).unwrap().into_catalog();
    assert_eq!(loaded.templates(), catalog.templates());
    assert_eq!(loaded.get_by_code("PIPE-001").unwrap().crew_size, 3);
}

#[test]
fn test_multi_source_with_configured_separator() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::io::Write::write_all(&mut file, br#"{"separator": "_"}"#).unwrap();
    let config = CatalogConfig::from_json_file(file.path()).unwrap();

    let records = vec![
        RecordBuilder::new("electrical", "تمديد").rate(40.0).source("بتروجت").build(),
        RecordBuilder::new("electrical", "تمديد").rate(60.0).source("حسن علام").build(),
    ];
    let catalog = CatalogBuilder::new(&config).build(&records).unwrap().catalog;
    assert_eq!(catalog.templates()[0].code, "ELEC_001");

    let result = MultiSourceAggregator::new(&catalog, &config.separator)
        .compare("ELEC_00")
        .unwrap();
    assert_eq!(result.code, "ELEC_001");
    assert_eq!(result.average_rate, 50.0);

    // 默认分隔符无法切出相同前缀
    let default_sep = CatalogConfig::default().separator;
    let mismatched = MultiSourceAggregator::new(&catalog, &default_sep).compare("ELEC_001_X");
    assert!(mismatched.is_none());
}
