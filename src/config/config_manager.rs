// ==========================================
// 产能目录 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表读取覆写项，解析为生效的 CatalogConfig
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::catalog_config::CatalogConfig;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::types::CrewRole;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// config_kv 键名
pub mod config_keys {
    pub const ID_PREFIX: &str = "catalog/id_prefix/";
    pub const CODE_PREFIX: &str = "catalog/code_prefix/";
    pub const ROLE_CODE: &str = "catalog/role_code/";
    pub const SHEET_CATEGORY: &str = "catalog/sheet_category/";
    pub const FALLBACK_PREFIX: &str = "catalog/fallback_prefix";
    pub const SEQUENCE_WIDTH: &str = "catalog/sequence_width";
    pub const SEPARATOR: &str = "catalog/separator";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        debug!(key = %key, value = %value, "配置已写入");
        Ok(())
    }

    /// 所有 catalog/ 前缀的配置项（按键排序）
    fn catalog_entries(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' AND key LIKE 'catalog/%' ORDER BY key",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            entries.insert(key, value);
        }
        Ok(entries)
    }

    /// 在 base 之上叠加 config_kv 覆写项，得到生效配置
    pub fn effective_config(&self, base: &CatalogConfig) -> RepositoryResult<CatalogConfig> {
        let mut config = base.clone();
        let entries = self.catalog_entries()?;

        for (key, value) in &entries {
            let value = value.trim().to_string();
            if let Some(category) = key.strip_prefix(config_keys::ID_PREFIX) {
                config.id_prefixes.insert(category.to_string(), value);
            } else if let Some(category) = key.strip_prefix(config_keys::CODE_PREFIX) {
                config.code_prefixes.insert(category.to_string(), value);
            } else if let Some(sheet) = key.strip_prefix(config_keys::SHEET_CATEGORY) {
                config.sheet_categories.insert(sheet.to_string(), value);
            } else if let Some(role) = key.strip_prefix(config_keys::ROLE_CODE) {
                let role: CrewRole = role.parse().map_err(|message| {
                    RepositoryError::FieldValueError {
                        field: key.clone(),
                        message,
                    }
                })?;
                config.roles.set_code(role, value);
            } else if key == config_keys::FALLBACK_PREFIX {
                config.fallback_prefix = value;
            } else if key == config_keys::SEPARATOR {
                config.separator = value;
            } else if key == config_keys::SEQUENCE_WIDTH {
                config.sequence_width =
                    value
                        .parse::<usize>()
                        .map_err(|e| RepositoryError::FieldValueError {
                            field: key.clone(),
                            message: format!("无法解析为整数: {} ({})", value, e),
                        })?;
            } else {
                debug!(key = %key, "忽略未知配置项");
            }
        }

        config
            .validate()
            .map_err(|e| RepositoryError::FieldValueError {
                field: "catalog".to_string(),
                message: e.to_string(),
            })?;

        info!(overrides = entries.len(), "目录配置已加载");
        Ok(config)
    }

    /// 生效配置快照（JSON）
    pub fn get_config_snapshot(&self, base: &CatalogConfig) -> RepositoryResult<String> {
        let config = self.effective_config(base)?;
        Ok(serde_json::to_string(&config)?)
    }
}
