// ==========================================
// 产能目录 - 命令行入口
// ==========================================
// 子命令: generate / compare / search / boq
// ==========================================

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use productivity_catalog::config::{CatalogConfig, ConfigManager};
use productivity_catalog::db::default_db_path;
use productivity_catalog::engine::MultiSourceAggregator;
use productivity_catalog::i18n::{self, category_display_name, t_with_args};
use productivity_catalog::importer::CatalogImporter;
use productivity_catalog::repository::{read_catalog_file, write_catalog_file, CatalogRepository};
use productivity_catalog::{logging, Catalog, APP_NAME, VERSION};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Display language for summaries (ar, en)
    #[arg(long, global = true, env = "PRODUCTIVITY_CATALOG_LOCALE", default_value = "ar")]
    locale: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the productivity catalog from a spreadsheet export
    Generate {
        /// Input file (.xlsx, .xls, .csv or .json)
        #[arg(short, long)]
        input: PathBuf,

        /// Output catalog JSON
        #[arg(short, long, default_value = "catalog.json")]
        output: PathBuf,

        /// Lookup table overrides (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// SQLite database for config overrides and persistence
        #[arg(long, env = "PRODUCTIVITY_CATALOG_DB")]
        db: Option<String>,

        /// Replace the stored catalog after a successful build
        #[arg(long)]
        persist: bool,
    },

    /// Compare productivity across sources for a code prefix
    Compare {
        /// Catalog JSON produced by `generate`
        #[arg(short, long, default_value = "catalog.json")]
        catalog: PathBuf,

        /// Template code (first two segments are used as prefix)
        #[arg(long)]
        code: String,

        /// Lookup table overrides used at generation time (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Search templates by name
    Search {
        #[arg(short, long, default_value = "catalog.json")]
        catalog: PathBuf,

        #[arg(short, long)]
        query: String,
    },

    /// Print the BOQ line for a template code
    Boq {
        #[arg(short, long, default_value = "catalog.json")]
        catalog: PathBuf,

        #[arg(long)]
        code: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    i18n::set_locale(&cli.locale);
    info!("{} v{}", APP_NAME, VERSION);

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            db,
            persist,
        } => generate(&input, &output, config.as_deref(), db, persist),
        Commands::Compare {
            catalog,
            code,
            config,
        } => compare(&catalog, &code, config.as_deref()),
        Commands::Search { catalog, query } => search(&catalog, &query),
        Commands::Boq { catalog, code } => boq(&catalog, &code),
    }
}

fn generate(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    db: Option<String>,
    persist: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;

    let db_path = match (db, persist) {
        (Some(path), _) => Some(path),
        (None, true) => Some(default_db_path()),
        (None, false) => None,
    };

    if let Some(path) = &db_path {
        let manager = ConfigManager::new(path)
            .with_context(|| format!("failed to open database {}", path))?;
        config = manager.effective_config(&config)?;
    }

    let mut importer = CatalogImporter::new(config);
    if persist {
        let path = db_path.ok_or_else(|| anyhow!("no database path for --persist"))?;
        info!(db = %path, "catalog will be persisted");
        importer = importer.with_repository(CatalogRepository::new(&path)?);
    }

    let result = importer
        .import_file(input)
        .with_context(|| format!("failed to build catalog from {}", input.display()))?;

    write_catalog_file(output, &result.to_export())?;

    let catalog = &result.catalog;
    let total = catalog.total().to_string();
    let active = catalog.active_count().to_string();
    println!(
        "{}",
        t_with_args("summary.generated", &[("total", total.as_str()), ("active", active.as_str())])
    );
    for (category, count) in catalog.category_counts() {
        let name = category_display_name(&category);
        let count = count.to_string();
        println!(
            "  {}",
            t_with_args(
                "summary.category_line",
                &[("category", name.as_str()), ("count", count.as_str())],
            )
        );
    }
    if result.report.has_unparsed_crew() {
        let unparsed = result.report.unparsed_crew.len().to_string();
        warn!(count = result.report.unparsed_crew.len(), "unrecognized crew descriptions kept for review");
        println!(
            "{}",
            t_with_args("summary.unparsed_crew", &[("count", unparsed.as_str())])
        );
    }
    let written = output.display().to_string();
    println!("{}", t_with_args("summary.written", &[("path", written.as_str())]));
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CatalogConfig> {
    match path {
        Some(path) => CatalogConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(CatalogConfig::default()),
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let export = read_catalog_file(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    Ok(export.into_catalog())
}

fn compare(catalog_path: &Path, code: &str, config_path: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let config = load_config(config_path)?;
    let aggregator = MultiSourceAggregator::new(&catalog, &config.separator);

    match aggregator.compare(code) {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => println!("{}", t_with_args("compare.not_found", &[("code", code)])),
    }
    Ok(())
}

fn search(catalog_path: &Path, query: &str) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let matches = catalog.search(query);
    if matches.is_empty() {
        println!("{}", i18n::t("search.no_results"));
        return Ok(());
    }
    for template in matches {
        println!(
            "{}\t{}\t{}\t{}",
            template.code, template.name_ar, template.unit, template.productivity_rate
        );
    }
    Ok(())
}

fn boq(catalog_path: &Path, code: &str) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let template = catalog
        .get_by_code(code.trim())
        .ok_or_else(|| anyhow!("template {} not found", code))?;
    println!("{}", serde_json::to_string_pretty(&template.to_boq_template())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_compare_accepts_config() {
        let cli = Cli::try_parse_from([
            "productivity-catalog",
            "compare",
            "--code",
            "SVC-001",
            "--config",
            "cfg.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Compare { code, config, .. } => {
                assert_eq!(code, "SVC-001");
                assert_eq!(config, Some(PathBuf::from("cfg.json")));
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_load_config_separator() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"separator": "_"}"#).unwrap();

        assert_eq!(load_config(Some(file.path())).unwrap().separator, "_");
        assert_eq!(load_config(None).unwrap().separator, "-");
    }
}
