// ==========================================
// 产能目录 - 目录仓储
// ==========================================
// 表: productivity_template + crew_member
// 红线: Repository 不含业务逻辑；目录整体替换，不做增量修改
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::catalog::Catalog;
use crate::domain::productivity::{CrewMember, ProductivityTemplate};
use crate::domain::types::ResourceKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const TEMPLATE_COLUMNS: &str = r#"
    id, code, sequence, name_ar, name_en, category_id, unit, unit_ar,
    productivity_rate, crew_size, source, source_ref, notes, crew_text, is_active
"#;

// ==========================================
// CatalogRepository - 目录仓储
// ==========================================
pub struct CatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepository {
    /// 打开数据库并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 建表（幂等）
    pub fn init_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        init_schema(&conn)?;
        Ok(())
    }

    /// 整体替换目录（单事务: 清空 → 按目录顺序写入模板与班组）
    ///
    /// # 返回
    /// - Ok(usize): 写入模板数
    #[instrument(skip(self, catalog), fields(total = catalog.total()))]
    pub fn replace_catalog(&self, catalog: &Catalog, run_id: Option<&str>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM crew_member", [])?;
        tx.execute("DELETE FROM productivity_template", [])?;

        let created_at = Utc::now().to_rfc3339();
        {
            let mut insert_template = tx.prepare(
                r#"
                INSERT INTO productivity_template (
                    id, code, position, sequence, name_ar, name_en, category_id, unit, unit_ar,
                    productivity_rate, crew_size, source, source_ref, notes, crew_text,
                    is_active, run_id, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
                "#,
            )?;
            let mut insert_member = tx.prepare(
                r#"
                INSERT INTO crew_member (template_id, position, role_code, qty, description, kind)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;

            for (position, template) in catalog.iter().enumerate() {
                insert_template.execute(params![
                    template.id,
                    template.code,
                    position as i64,
                    template.sequence,
                    template.name_ar,
                    template.name_en,
                    template.category_id,
                    template.unit,
                    template.unit_ar,
                    template.productivity_rate,
                    template.crew_size,
                    template.source,
                    template.source_ref,
                    template.notes,
                    template.crew_text,
                    template.is_active,
                    run_id,
                    created_at,
                ])?;

                for (member_pos, member) in template.crew.iter().enumerate() {
                    insert_member.execute(params![
                        template.id,
                        member_pos as i64,
                        member.role_code,
                        member.quantity,
                        member.description,
                        member.kind.to_string(),
                    ])?;
                }
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(total = catalog.total(), run_id = ?run_id, "目录已落库");
        Ok(catalog.total())
    }

    /// 读取完整目录（按存储顺序重建索引）
    pub fn load_catalog(&self) -> RepositoryResult<Catalog> {
        let conn = self.get_conn()?;
        let mut crews = load_crews(&conn)?;

        let sql = format!(
            "SELECT {} FROM productivity_template ORDER BY position ASC",
            TEMPLATE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut templates = stmt
            .query_map([], map_template)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for template in &mut templates {
            template.crew = crews.remove(&template.id).unwrap_or_default();
        }

        debug!(total = templates.len(), "目录已读取");
        Ok(Catalog::from_templates(templates))
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM productivity_template", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 按 code 精确查询
    ///
    /// # 返回
    /// - Ok(None): 未找到
    pub fn find_by_code(&self, code: &str) -> RepositoryResult<Option<ProductivityTemplate>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM productivity_template WHERE code = ?1",
            TEMPLATE_COLUMNS
        );
        let template = conn
            .query_row(&sql, params![code], map_template)
            .optional()?;

        let Some(mut template) = template else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT role_code, qty, description, kind
            FROM crew_member
            WHERE template_id = ?1
            ORDER BY position ASC
            "#,
        )?;
        template.crew = stmt
            .query_map(params![template.id], |row| {
                Ok(CrewMember {
                    role_code: row.get(0)?,
                    quantity: row.get(1)?,
                    description: row.get(2)?,
                    kind: parse_kind(&row.get::<_, String>(3)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(template))
    }
}

fn map_template(row: &Row<'_>) -> rusqlite::Result<ProductivityTemplate> {
    Ok(ProductivityTemplate {
        id: row.get(0)?,
        code: row.get(1)?,
        sequence: row.get(2)?,
        name_ar: row.get(3)?,
        name_en: row.get(4)?,
        category_id: row.get(5)?,
        unit: row.get(6)?,
        unit_ar: row.get(7)?,
        productivity_rate: row.get(8)?,
        crew_size: row.get(9)?,
        crew: Vec::new(),
        source: row.get(10)?,
        source_ref: row.get(11)?,
        notes: row.get(12)?,
        crew_text: row.get(13)?,
        is_active: row.get(14)?,
    })
}

fn load_crews(conn: &Connection) -> RepositoryResult<HashMap<String, Vec<CrewMember>>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT template_id, role_code, qty, description, kind
        FROM crew_member
        ORDER BY template_id ASC, position ASC
        "#,
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            CrewMember {
                role_code: row.get(1)?,
                quantity: row.get(2)?,
                description: row.get(3)?,
                kind: parse_kind(&row.get::<_, String>(4)?),
            },
        ))
    })?;

    let mut crews: HashMap<String, Vec<CrewMember>> = HashMap::new();
    for row in rows {
        let (template_id, member) = row?;
        crews.entry(template_id).or_default().push(member);
    }
    Ok(crews)
}

fn parse_kind(value: &str) -> ResourceKind {
    match value {
        "equipment" => ResourceKind::Equipment,
        _ => ResourceKind::Labor,
    }
}
