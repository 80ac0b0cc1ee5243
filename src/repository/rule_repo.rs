// ==========================================
// Designações RVM - Repositório de regras
// ==========================================
// CRUD da tabela rule. As condições são gravadas como
// JSON TEXT, no mesmo formato do documento de backup.
// ==========================================

use crate::domain::rule::{Rule, RuleCondition};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct RuleRepository {
    conn: Arc<Mutex<Connection>>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, bool, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_row(raw: (String, String, bool, String)) -> RepositoryResult<Rule> {
    let (id, description, is_active, conditions_json) = raw;
    let conditions: Vec<RuleCondition> = serde_json::from_str(&conditions_json)?;
    Ok(Rule {
        id,
        description,
        is_active,
        conditions,
    })
}

impl RuleRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insere ou substitui uma regra.
    pub fn save(&self, rule: &Rule) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO rule (id, description, is_active, conditions)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                rule.id,
                rule.description,
                rule.is_active,
                serde_json::to_string(&rule.conditions)?,
            ],
        )?;
        Ok(())
    }

    /// Gravação em lote, tudo ou nada.
    pub fn save_all(&self, rules: &[Rule]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        for rule in rules {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO rule (id, description, is_active, conditions)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    rule.id,
                    rule.description,
                    rule.is_active,
                    serde_json::to_string(&rule.conditions)?,
                ],
            )?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Rule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, description, is_active, conditions FROM rule WHERE id = ?1",
        )?;
        let raw = stmt.query_row(params![id], read_row).optional()?;
        raw.map(decode_row).transpose()
    }

    pub fn find_all(&self) -> RepositoryResult<Vec<Rule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, description, is_active, conditions FROM rule ORDER BY description",
        )?;
        let rows = stmt.query_map([], read_row)?;
        let mut rules = Vec::new();
        for raw in rows {
            rules.push(decode_row(raw?)?);
        }
        Ok(rules)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM rule WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn delete_all(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM rule", [])?;
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM rule", [], |row| row.get(0))?;
        Ok(count)
    }
}
