use crate::bom_structure::domain::{
    ArticleAttributes, ArticleCode, ChildEdge, ParentEdge, Quantity, RelationEdge,
};
use crate::ports::outbound::{RelationGateway, RelationSession};
use crate::shared::error::BomError;
use crate::shared::Result;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, InterruptHandle, OpenFlags};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates the relation and article tables if they do not exist
///
/// Mirrors the columns of the legacy structure table; codes are stored as
/// written and compared trimmed and upper-cased.
pub fn install_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS bom_relation (
            parent_code TEXT NOT NULL,
            child_code TEXT NOT NULL,
            quantity TEXT,
            sequence INTEGER NOT NULL DEFAULT 0,
            valid_until TEXT
        );
        CREATE INDEX IF NOT EXISTS bom_relation_parent ON bom_relation(parent_code);
        CREATE INDEX IF NOT EXISTS bom_relation_child ON bom_relation(child_code);
        CREATE TABLE IF NOT EXISTS article (
            code TEXT PRIMARY KEY,
            description TEXT,
            revision_letter TEXT
        );
        "#,
    )
}

/// Inserts one relation row
pub fn insert_relation(conn: &Connection, edge: &RelationEdge) -> rusqlite::Result<()> {
    let quantity: Option<String> = edge.quantity.clone().into();
    conn.execute(
        "INSERT INTO bom_relation (parent_code, child_code, quantity, sequence, valid_until) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            edge.parent_code.as_str(),
            edge.child_code.as_str(),
            quantity,
            edge.sequence,
            edge.valid_until.map(|date| date.to_string()),
        ],
    )?;
    Ok(())
}

/// Inserts or replaces one article row
pub fn insert_article(
    conn: &Connection,
    code: &ArticleCode,
    attributes: &ArticleAttributes,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO article (code, description, revision_letter) VALUES (?1, ?2, ?3)",
        params![
            code.as_str(),
            attributes.description,
            attributes.revision_letter
        ],
    )?;
    Ok(())
}

/// SqliteRelationStore adapter reading the relation table from a SQLite file
///
/// Every session opens its own read-only connection; the connection is closed
/// when the session is dropped. Queries run on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteRelationStore {
    path: PathBuf,
}

impl SqliteRelationStore {
    /// Points the store at an existing database file
    ///
    /// # Errors
    /// `BomError::DatabaseNotFound` if `path` does not exist
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(BomError::DatabaseNotFound {
                suggestion: "Pass --database or set `database` in bom-trace.config.yml".to_string(),
                path,
            }
            .into());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RelationGateway for SqliteRelationStore {
    type Session = SqliteRelationSession;

    async fn open_session(&self) -> Result<Self::Session> {
        let path = self.path.clone();
        let conn = tokio::task::spawn_blocking(move || -> Result<Connection> {
            let conn = Connection::open_with_flags(
                &path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| BomError::DatabaseOpenError {
                path: path.clone(),
                details: e.to_string(),
            })?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            Ok(conn)
        })
        .await
        .context("Relation database open task failed")??;

        tracing::debug!(target: "bom_trace::sqlite", path = %self.path.display(), "Session opened");
        Ok(SqliteRelationSession {
            interrupt: conn.get_interrupt_handle(),
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// One read-only connection to the relation database
///
/// Queries run on the blocking pool and outlive a timed-out caller, so
/// dropping the session interrupts whatever statement is still running.
pub struct SqliteRelationSession {
    conn: Arc<Mutex<Connection>>,
    interrupt: InterruptHandle,
}

impl std::fmt::Debug for SqliteRelationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRelationSession").finish_non_exhaustive()
    }
}

impl Drop for SqliteRelationSession {
    fn drop(&mut self) {
        if Arc::strong_count(&self.conn) > 1 {
            tracing::debug!(target: "bom_trace::sqlite", "Interrupting query of dropped session");
        }
        self.interrupt.interrupt();
    }
}

impl SqliteRelationSession {
    async fn with_connection<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| anyhow!("Relation database connection is poisoned"))?;
            query(&guard).map_err(anyhow::Error::from)
        })
        .await
        .context("Relation query task failed")?
    }
}

/// Decodes a stored code; rows with unusable codes are skipped
fn decode_code(raw: &str, column: &str) -> Option<ArticleCode> {
    match ArticleCode::new(raw) {
        Ok(code) => Some(code),
        Err(e) => {
            tracing::warn!(target: "bom_trace::sqlite", column, raw, error = %e, "Skipping row with unusable code");
            None
        }
    }
}

/// The quantity column is free text in the legacy table but may hold numbers
fn decode_quantity(value: Value) -> Quantity {
    match value {
        Value::Null | Value::Blob(_) => Quantity::Unspecified,
        Value::Integer(whole) => Quantity::Amount(whole as f64),
        Value::Real(amount) => Quantity::parse(Some(amount.to_string().as_str())),
        Value::Text(text) => Quantity::parse(Some(text.as_str())),
    }
}

#[async_trait]
impl RelationSession for SqliteRelationSession {
    async fn children_of(&self, code: &ArticleCode) -> Result<Vec<ChildEdge>> {
        let parent = code.to_string();
        let rows: Vec<(String, Value, i64)> = self
            .with_connection(move |conn| {
                let mut stmt = conn.prepare_cached(
                    r#"
                    SELECT child_code, quantity, sequence
                    FROM bom_relation
                    WHERE UPPER(TRIM(parent_code)) = ?1
                        AND valid_until IS NULL
                    ORDER BY sequence ASC
                    "#,
                )?;
                let rows = stmt.query_map(params![parent], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?;
                rows.collect()
            })
            .await?;

        tracing::debug!(target: "bom_trace::sqlite", code = %code, rows = rows.len(), "Children query");

        Ok(rows
            .into_iter()
            .filter_map(|(child, quantity, sequence)| {
                Some(ChildEdge {
                    child_code: decode_code(&child, "child_code")?,
                    quantity: decode_quantity(quantity),
                    sequence,
                })
            })
            .collect())
    }

    async fn parents_of(&self, code: &ArticleCode) -> Result<Vec<ParentEdge>> {
        let child = code.to_string();
        let rows: Vec<String> = self
            .with_connection(move |conn| {
                let mut stmt = conn.prepare_cached(
                    r#"
                    SELECT parent_code
                    FROM bom_relation
                    WHERE UPPER(TRIM(child_code)) = ?1
                        AND valid_until IS NULL
                    "#,
                )?;
                let rows = stmt.query_map(params![child], |row| row.get(0))?;
                rows.collect()
            })
            .await?;

        tracing::debug!(target: "bom_trace::sqlite", code = %code, rows = rows.len(), "Parents query");

        Ok(rows
            .iter()
            .filter_map(|parent| decode_code(parent, "parent_code"))
            .map(|parent_code| ParentEdge { parent_code })
            .collect())
    }

    async fn attributes_for(
        &self,
        codes: &[ArticleCode],
    ) -> Result<HashMap<ArticleCode, ArticleAttributes>> {
        if codes.is_empty() {
            return Ok(HashMap::new());
        }

        let wanted: Vec<String> = codes.iter().map(ToString::to_string).collect();
        let rows: Vec<(String, Option<String>, Option<String>)> = self
            .with_connection(move |conn| {
                let placeholders = vec!["?"; wanted.len()].join(", ");
                let sql = format!(
                    "SELECT code, description, revision_letter FROM article WHERE UPPER(TRIM(code)) IN ({})",
                    placeholders
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(wanted.iter()), |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?;
                rows.collect()
            })
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(code, description, revision_letter)| {
                Some((
                    decode_code(&code, "code")?,
                    ArticleAttributes::new(
                        description.unwrap_or_default(),
                        revision_letter.unwrap_or_default(),
                    ),
                ))
            })
            .collect())
    }
}
