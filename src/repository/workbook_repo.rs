// ==========================================
// Designações RVM - Repositório de apostilas
// ==========================================
// CRUD da tabela workbook. O conteúdo do arquivo é carga
// opaca (base64 em TEXT); o núcleo nunca o interpreta.
// ==========================================

use crate::domain::workbook::Workbook;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct WorkbookRepository {
    conn: Arc<Mutex<Connection>>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Workbook> {
    Ok(Workbook {
        id: row.get(0)?,
        name: row.get(1)?,
        file_data: row.get(2)?,
        upload_date: row.get(3)?,
    })
}

impl WorkbookRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insere ou substitui uma apostila.
    pub fn save(&self, workbook: &Workbook) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO workbook (id, name, file_data, upload_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                workbook.id,
                workbook.name,
                workbook.file_data,
                workbook.upload_date,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Workbook>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, file_data, upload_date FROM workbook WHERE id = ?1",
        )?;
        let workbook = stmt.query_row(params![id], read_row).optional()?;
        Ok(workbook)
    }

    /// Todas as apostilas, das mais recentes para as mais antigas.
    pub fn find_all(&self) -> RepositoryResult<Vec<Workbook>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, file_data, upload_date FROM workbook ORDER BY upload_date DESC",
        )?;
        let rows = stmt.query_map([], read_row)?;
        let mut workbooks = Vec::new();
        for workbook in rows {
            workbooks.push(workbook?);
        }
        Ok(workbooks)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM workbook WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn delete_all(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM workbook", [])?;
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM workbook", [], |row| row.get(0))?;
        Ok(count)
    }
}
