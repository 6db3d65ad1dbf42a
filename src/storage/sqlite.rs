//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ResultStore trait.

use crate::job::{AnalysisJob, HeadingCounts, JobId, JobStatus, PageAnalysis};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{check_transition, ResultStore, StorageError, StorageResult};
use crate::AuditError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const JOB_COLUMNS: &str = "id, url, status, html_version, page_title, h1, h2, h3, h4, h5, h6,
     internal_links, external_links, login_form_detected, error_detail, created_at, updated_at";

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

/// A `jobs` row before the broken links are attached
struct JobRow {
    id: JobId,
    url: String,
    status: String,
    html_version: Option<String>,
    page_title: Option<String>,
    headings: [u32; 6],
    internal_links: u32,
    external_links: u32,
    login_form_detected: bool,
    error_detail: Option<String>,
    created_at: String,
    updated_at: String,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            url: row.get(1)?,
            status: row.get(2)?,
            html_version: row.get(3)?,
            page_title: row.get(4)?,
            headings: [
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
                row.get(10)?,
            ],
            internal_links: row.get(11)?,
            external_links: row.get(12)?,
            login_form_detected: row.get(13)?,
            error_detail: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> Result<Self, AuditError> {
        let conn = Connection::open(path).map_err(StorageError::from)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StorageError::from)?;

        initialize_schema(&conn).map_err(StorageError::from)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, AuditError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StorageError::from)?;
        initialize_schema(&conn).map_err(StorageError::from)?;
        Ok(Self { conn })
    }

    fn current_status(conn: &Connection, id: JobId) -> StorageResult<JobStatus> {
        let status: Option<String> = conn
            .query_row("SELECT status FROM jobs WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;

        let status = status.ok_or(StorageError::JobNotFound(id))?;
        JobStatus::from_db_string(&status).ok_or_else(|| StorageError::Corrupt {
            id,
            message: format!("unknown status '{}'", status),
        })
    }

    fn broken_links(&self, id: JobId) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM broken_links WHERE job_id = ?1 ORDER BY position")?;
        let urls = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(urls)
    }

    fn job_from_row(&self, row: JobRow) -> StorageResult<AnalysisJob> {
        let status = JobStatus::from_db_string(&row.status).ok_or_else(|| StorageError::Corrupt {
            id: row.id,
            message: format!("unknown status '{}'", row.status),
        })?;

        let result = if status == JobStatus::Done {
            Some(PageAnalysis {
                html_version: row.html_version.unwrap_or_default(),
                page_title: row.page_title.unwrap_or_default(),
                heading_counts: HeadingCounts::new(row.headings),
                internal_link_count: row.internal_links,
                external_link_count: row.external_links,
                broken_links: self.broken_links(row.id)?,
                login_form_detected: row.login_form_detected,
            })
        } else {
            None
        };

        let error_detail = if status == JobStatus::Error {
            Some(row.error_detail.unwrap_or_default())
        } else {
            None
        };

        Ok(AnalysisJob {
            id: row.id,
            target_url: row.url,
            status,
            result,
            error_detail,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl ResultStore for SqliteStore {
    fn create(&mut self, target_url: &str) -> StorageResult<JobId> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO jobs (url, status, internal_links, external_links, created_at, updated_at)
             VALUES (?1, ?2, 0, 0, ?3, ?3)",
            params![target_url, JobStatus::Queued.to_db_string(), now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn set_status(&mut self, id: JobId, status: JobStatus) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        let current = Self::current_status(&tx, id)?;
        check_transition(id, current, status)?;

        tx.execute(
            "UPDATE jobs SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), Utc::now().to_rfc3339(), id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn set_result(&mut self, id: JobId, analysis: &PageAnalysis) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        let current = Self::current_status(&tx, id)?;
        check_transition(id, current, JobStatus::Done)?;

        let h = analysis.heading_counts.as_array();
        tx.execute(
            "UPDATE jobs SET status = ?1, html_version = ?2, page_title = ?3,
             h1 = ?4, h2 = ?5, h3 = ?6, h4 = ?7, h5 = ?8, h6 = ?9,
             internal_links = ?10, external_links = ?11, login_form_detected = ?12,
             error_detail = NULL, updated_at = ?13
             WHERE id = ?14",
            params![
                JobStatus::Done.to_db_string(),
                analysis.html_version,
                analysis.page_title,
                h[0],
                h[1],
                h[2],
                h[3],
                h[4],
                h[5],
                analysis.internal_link_count,
                analysis.external_link_count,
                analysis.login_form_detected,
                Utc::now().to_rfc3339(),
                id
            ],
        )?;

        tx.execute("DELETE FROM broken_links WHERE job_id = ?1", params![id])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO broken_links (job_id, position, url) VALUES (?1, ?2, ?3)",
            )?;
            for (position, url) in analysis.broken_links.iter().enumerate() {
                insert.execute(params![id, position as i64, url])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn set_error(&mut self, id: JobId, detail: &str) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        let current = Self::current_status(&tx, id)?;
        check_transition(id, current, JobStatus::Error)?;

        tx.execute(
            "UPDATE jobs SET status = ?1, error_detail = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                JobStatus::Error.to_db_string(),
                detail,
                Utc::now().to_rfc3339(),
                id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn reset(&mut self, id: JobId) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        Self::current_status(&tx, id)?;

        tx.execute(
            "UPDATE jobs SET status = ?1, html_version = NULL, page_title = NULL,
             h1 = 0, h2 = 0, h3 = 0, h4 = 0, h5 = 0, h6 = 0,
             internal_links = 0, external_links = 0, login_form_detected = 0,
             error_detail = NULL, updated_at = ?2
             WHERE id = ?3",
            params![JobStatus::Queued.to_db_string(), Utc::now().to_rfc3339(), id],
        )?;
        tx.execute("DELETE FROM broken_links WHERE job_id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: JobId) -> StorageResult<AnalysisJob> {
        let sql = format!("SELECT {} FROM jobs WHERE id = ?1", JOB_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![id], JobRow::from_row)
            .optional()?
            .ok_or(StorageError::JobNotFound(id))?;
        self.job_from_row(row)
    }

    fn list_all(&self) -> StorageResult<Vec<AnalysisJob>> {
        let sql = format!("SELECT {} FROM jobs ORDER BY id", JOB_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], JobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(|row| self.job_from_row(row)).collect()
    }

    fn delete(&mut self, id: JobId) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM broken_links WHERE job_id = ?1", params![id])?;
        tx.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }
}
