// ==========================================
// Designações RVM - Repositórios de eventos especiais
// ==========================================
// CRUD das tabelas special_event e event_template.
// O índice UNIQUE em special_event.week garante no máximo
// um evento por semana; a violação chega ao chamador como
// UniqueConstraintViolation.
// ==========================================

use crate::domain::event::{
    EventConfiguration, EventDefaults, EventImpact, EventTemplate, SpecialEvent,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// Eventos especiais
// ==========================================
pub struct SpecialEventRepository {
    conn: Arc<Mutex<Connection>>,
}

struct SpecialEventRow {
    id: String,
    week: String,
    template_id: String,
    theme: String,
    assigned_to: String,
    duration: u32,
    configuration: String,
}

const EVENT_COLUMNS: &str = "id, week, template_id, theme, assigned_to, duration, configuration";

fn read_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SpecialEventRow> {
    Ok(SpecialEventRow {
        id: row.get(0)?,
        week: row.get(1)?,
        template_id: row.get(2)?,
        theme: row.get(3)?,
        assigned_to: row.get(4)?,
        duration: row.get(5)?,
        configuration: row.get(6)?,
    })
}

fn decode_event_row(raw: SpecialEventRow) -> RepositoryResult<SpecialEvent> {
    let configuration: EventConfiguration = serde_json::from_str(&raw.configuration)?;
    Ok(SpecialEvent {
        id: raw.id,
        week: raw.week,
        template_id: raw.template_id,
        theme: raw.theme,
        assigned_to: raw.assigned_to,
        duration: raw.duration,
        configuration,
    })
}

impl SpecialEventRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insere ou substitui um evento. Uma semana só comporta um
    /// evento: o segundo para a mesma semana falha com violação
    /// de unicidade. O upsert é pela chave `id` apenas — OR
    /// REPLACE engoliria a violação do índice de semana.
    pub fn save(&self, event: &SpecialEvent) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO special_event (
                id, week, template_id, theme, assigned_to, duration, configuration
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                week = excluded.week,
                template_id = excluded.template_id,
                theme = excluded.theme,
                assigned_to = excluded.assigned_to,
                duration = excluded.duration,
                configuration = excluded.configuration
            "#,
            params![
                event.id,
                event.week,
                event.template_id,
                event.theme,
                event.assigned_to,
                event.duration,
                serde_json::to_string(&event.configuration)?,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<SpecialEvent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM special_event WHERE id = ?1"
        ))?;
        let raw = stmt.query_row(params![id], read_event_row).optional()?;
        raw.map(decode_event_row).transpose()
    }

    pub fn find_by_week(&self, week: &str) -> RepositoryResult<Option<SpecialEvent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM special_event WHERE week = ?1"
        ))?;
        let raw = stmt.query_row(params![week], read_event_row).optional()?;
        raw.map(decode_event_row).transpose()
    }

    pub fn find_all(&self) -> RepositoryResult<Vec<SpecialEvent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM special_event ORDER BY week"
        ))?;
        let rows = stmt.query_map([], read_event_row)?;
        let mut events = Vec::new();
        for raw in rows {
            events.push(decode_event_row(raw?)?);
        }
        Ok(events)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM special_event WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn delete_all(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM special_event", [])?;
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM special_event", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ==========================================
// Modelos de evento
// ==========================================
pub struct EventTemplateRepository {
    conn: Arc<Mutex<Connection>>,
}

fn read_template_row(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<(String, String, String, String, String)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn decode_template_row(
    raw: (String, String, String, String, String),
) -> RepositoryResult<EventTemplate> {
    let (id, name, description, impact_json, defaults_json) = raw;
    let impact: EventImpact = serde_json::from_str(&impact_json)?;
    let defaults: EventDefaults = serde_json::from_str(&defaults_json)?;
    Ok(EventTemplate {
        id,
        name,
        description,
        impact,
        defaults,
    })
}

impl EventTemplateRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insere ou substitui um modelo de evento.
    pub fn save(&self, template: &EventTemplate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO event_template (id, name, description, impact, defaults)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                template.id,
                template.name,
                template.description,
                serde_json::to_string(&template.impact)?,
                serde_json::to_string(&template.defaults)?,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<EventTemplate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, impact, defaults FROM event_template WHERE id = ?1",
        )?;
        let raw = stmt.query_row(params![id], read_template_row).optional()?;
        raw.map(decode_template_row).transpose()
    }

    pub fn find_all(&self) -> RepositoryResult<Vec<EventTemplate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, impact, defaults FROM event_template ORDER BY name",
        )?;
        let rows = stmt.query_map([], read_template_row)?;
        let mut templates = Vec::new();
        for raw in rows {
            templates.push(decode_template_row(raw?)?);
        }
        Ok(templates)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM event_template WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn delete_all(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM event_template", [])?;
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM event_template", [], |row| row.get(0))?;
        Ok(count)
    }
}
