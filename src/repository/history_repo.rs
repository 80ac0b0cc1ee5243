// ==========================================
// Designações RVM - Repositório de backup do histórico
// ==========================================
// Uma entrada por semana: a pauta congelada como JSON.
// A exclusão por semana remove participações E backup na
// mesma transação — remoção parcial é bug de integridade.
// A restauração por registro tolera falhas: loga e segue.
// ==========================================

use crate::domain::participation::{HistoryBackupItem, Participation};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::participation_repo::insert_participation;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct HistoryBackupRepository {
    conn: Arc<Mutex<Connection>>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, DateTime<Utc>)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_row(
    raw: (String, String, String, DateTime<Utc>),
) -> RepositoryResult<HistoryBackupItem> {
    let (id, week, participations_json, imported_at) = raw;
    let participations: Vec<Participation> = serde_json::from_str(&participations_json)?;
    Ok(HistoryBackupItem {
        id,
        week,
        participations,
        imported_at,
    })
}

impl HistoryBackupRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Agrupa as participações por semana e grava um snapshot por
    /// semana, substituindo o snapshot anterior da mesma semana.
    pub fn save_backup(&self, participations: &[Participation]) -> RepositoryResult<usize> {
        let mut by_week: HashMap<&str, Vec<Participation>> = HashMap::new();
        for p in participations {
            by_week.entry(p.week.as_str()).or_default().push(p.clone());
        }

        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let weeks = by_week.len();
        for (week, snapshot) in by_week {
            let item = HistoryBackupItem::new(week, snapshot);
            tx.execute(
                r#"
                INSERT INTO history_backup (id, week, participations, imported_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(week) DO UPDATE SET
                    participations = excluded.participations,
                    imported_at = excluded.imported_at
                "#,
                params![
                    item.id,
                    item.week,
                    serde_json::to_string(&item.participations)?,
                    item.imported_at,
                ],
            )?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(weeks)
    }

    pub fn find_by_week(&self, week: &str) -> RepositoryResult<Option<HistoryBackupItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, week, participations, imported_at FROM history_backup WHERE week = ?1",
        )?;
        let raw = stmt.query_row(params![week], read_row).optional()?;
        raw.map(decode_row).transpose()
    }

    pub fn find_all(&self) -> RepositoryResult<Vec<HistoryBackupItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, week, participations, imported_at FROM history_backup ORDER BY week",
        )?;
        let rows = stmt.query_map([], read_row)?;
        let mut items = Vec::new();
        for raw in rows {
            items.push(decode_row(raw?)?);
        }
        Ok(items)
    }

    /// Reinsere semanas presentes no backup e ausentes das
    /// participações. A comparação de semanas ignora
    /// maiúsculas/minúsculas, como nas importações antigas.
    /// Snapshots ilegíveis são logados e pulados, nunca fatais.
    pub fn restore_missing(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;

        let existing_weeks: Vec<String> = {
            let mut stmt = conn.prepare("SELECT DISTINCT week FROM participation")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut weeks = Vec::new();
            for week in rows {
                weeks.push(week?.to_lowercase());
            }
            weeks
        };

        let backups: Vec<(String, String)> = {
            let mut stmt = conn.prepare("SELECT week, participations FROM history_backup")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let mut items = Vec::new();
            for raw in rows {
                items.push(raw?);
            }
            items
        };

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let mut restored = 0usize;
        for (week, participations_json) in backups {
            if existing_weeks.contains(&week.to_lowercase()) {
                continue;
            }
            let snapshot: Vec<Participation> = match serde_json::from_str(&participations_json) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(semana = %week, erro = %e, "snapshot ilegível ignorado na restauração");
                    continue;
                }
            };
            for p in &snapshot {
                insert_participation(&tx, p)?;
            }
            info!(semana = %week, partes = snapshot.len(), "semana restaurada do backup");
            restored += 1;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(restored)
    }

    /// Substitui as participações de uma semana pelo snapshot do
    /// backup indicado (apaga e reinsere na mesma transação).
    pub fn force_restore(&self, backup_id: &str) -> RepositoryResult<usize> {
        let item = self
            .find_by_id(backup_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "HistoryBackupItem".to_string(),
                id: backup_id.to_string(),
            })?;

        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        tx.execute("DELETE FROM participation WHERE week = ?1", params![item.week])?;
        for p in &item.participations {
            insert_participation(&tx, p)?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        info!(semana = %item.week, partes = item.participations.len(), "semana restaurada à força");
        Ok(item.participations.len())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<HistoryBackupItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, week, participations, imported_at FROM history_backup WHERE id = ?1",
        )?;
        let raw = stmt.query_row(params![id], read_row).optional()?;
        raw.map(decode_row).transpose()
    }

    /// Remove as participações da semana E o snapshot de backup
    /// correspondente, atomicamente.
    pub fn delete_week(&self, week: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let removed = tx.execute("DELETE FROM participation WHERE week = ?1", params![week])?;
        tx.execute("DELETE FROM history_backup WHERE week = ?1", params![week])?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        info!(semana = %week, partes = removed, "semana excluída com seu backup");
        Ok(removed)
    }

    pub fn delete_all(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM history_backup", [])?;
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM history_backup", [], |row| row.get(0))?;
        Ok(count)
    }
}
