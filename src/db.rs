// ==========================================
// 产能目录 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout
// - 集中维护目录库 schema（幂等建表）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS productivity_template (
            id TEXT PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            position INTEGER NOT NULL,
            sequence INTEGER NOT NULL,
            name_ar TEXT NOT NULL,
            name_en TEXT,
            category_id TEXT NOT NULL,
            unit TEXT NOT NULL,
            unit_ar TEXT NOT NULL,
            productivity_rate REAL NOT NULL,
            crew_size INTEGER NOT NULL,
            source TEXT NOT NULL,
            source_ref TEXT,
            notes TEXT,
            crew_text TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            run_id TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_template_category ON productivity_template(category_id);
        CREATE INDEX IF NOT EXISTS idx_template_source ON productivity_template(source);

        CREATE TABLE IF NOT EXISTS crew_member (
            template_id TEXT NOT NULL REFERENCES productivity_template(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            role_code TEXT NOT NULL,
            qty INTEGER NOT NULL,
            description TEXT NOT NULL,
            kind TEXT NOT NULL DEFAULT 'labor',
            PRIMARY KEY (template_id, position)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 默认数据库路径
///
/// 优先级: PRODUCTIVITY_CATALOG_DB 环境变量 > 用户数据目录 > 当前目录
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var("PRODUCTIVITY_CATALOG_DB") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./productivity_catalog.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("productivity-catalog");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("productivity_catalog.db");
        }
    }
    path.to_string_lossy().to_string()
}
