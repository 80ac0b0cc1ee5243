// ==========================================
// Designações RVM - Repositório de participações
// ==========================================
// CRUD da tabela participation. O campo `order` do domínio
// é gravado na coluna `part_order` (ORDER é palavra
// reservada do SQL).
// ==========================================

use crate::domain::participation::Participation;
use crate::domain::types::ParticipationType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct ParticipationRepository {
    conn: Arc<Mutex<Connection>>,
}

/// Linha crua da tabela, antes da decodificação do tipo.
struct ParticipationRow {
    id: String,
    publisher_name: String,
    week: String,
    date: DateTime<Utc>,
    part_title: String,
    part_type: String,
    duration: Option<u32>,
    order: Option<u32>,
    part_number: Option<i32>,
}

const SELECT_COLUMNS: &str =
    "id, publisher_name, week, date, part_title, part_type, duration, part_order, part_number";

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ParticipationRow> {
    Ok(ParticipationRow {
        id: row.get(0)?,
        publisher_name: row.get(1)?,
        week: row.get(2)?,
        date: row.get(3)?,
        part_title: row.get(4)?,
        part_type: row.get(5)?,
        duration: row.get(6)?,
        order: row.get(7)?,
        part_number: row.get(8)?,
    })
}

fn decode_row(raw: ParticipationRow) -> RepositoryResult<Participation> {
    let part_type = ParticipationType::parse(&raw.part_type).ok_or_else(|| {
        RepositoryError::FieldValueError {
            field: "part_type".to_string(),
            message: raw.part_type.clone(),
        }
    })?;
    Ok(Participation {
        id: raw.id,
        publisher_name: raw.publisher_name,
        week: raw.week,
        date: raw.date,
        part_title: raw.part_title,
        part_type,
        duration: raw.duration,
        order: raw.order,
        part_number: raw.part_number,
    })
}

/// Insere ou substitui uma participação usando a conexão (ou
/// transação) dada. Compartilhado com o repositório de backup.
pub(crate) fn insert_participation(
    conn: &Connection,
    p: &Participation,
) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO participation (
            id, publisher_name, week, date, part_title, part_type,
            duration, part_order, part_number
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            p.id,
            p.publisher_name,
            p.week,
            p.date,
            p.part_title,
            p.part_type.as_str(),
            p.duration,
            p.order,
            p.part_number,
        ],
    )?;
    Ok(())
}

impl ParticipationRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insere ou substitui uma participação.
    pub fn save(&self, participation: &Participation) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_participation(&conn, participation)
    }

    /// Gravação em lote, tudo ou nada.
    pub fn save_all(&self, participations: &[Participation]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        for p in participations {
            insert_participation(&tx, p)?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Participation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM participation WHERE id = ?1"
        ))?;
        let raw = stmt.query_row(params![id], read_row).optional()?;
        raw.map(decode_row).transpose()
    }

    /// Todas as participações, das mais recentes para as mais antigas.
    pub fn find_all(&self) -> RepositoryResult<Vec<Participation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM participation ORDER BY date DESC, part_order"
        ))?;
        let rows = stmt.query_map([], read_row)?;
        let mut participations = Vec::new();
        for raw in rows {
            participations.push(decode_row(raw?)?);
        }
        Ok(participations)
    }

    /// Pauta completa de uma semana, na ordem de exibição.
    pub fn find_by_week(&self, week: &str) -> RepositoryResult<Vec<Participation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM participation WHERE week = ?1 ORDER BY part_order, part_title"
        ))?;
        let rows = stmt.query_map(params![week], read_row)?;
        let mut participations = Vec::new();
        for raw in rows {
            participations.push(decode_row(raw?)?);
        }
        Ok(participations)
    }

    /// Semanas distintas presentes no histórico.
    pub fn distinct_weeks(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT week FROM participation")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut weeks = Vec::new();
        for week in rows {
            weeks.push(week?);
        }
        Ok(weeks)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM participation WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn delete_all(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM participation", [])?;
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM participation", [], |row| row.get(0))?;
        Ok(count)
    }
}
