// ==========================================
// Designações RVM - Repositório de publicadores
// ==========================================
// CRUD da tabela publisher. Sem lógica de negócio.
// Campos aninhados gravados como JSON TEXT.
// ==========================================

use crate::domain::publisher::{Availability, Publisher, PublisherPrivileges, SectionPermissions};
use crate::domain::types::{AgeGroup, Condition, Gender};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct PublisherRepository {
    conn: Arc<Mutex<Connection>>,
}

/// Linha crua da tabela, antes da decodificação JSON.
struct PublisherRow {
    id: String,
    name: String,
    gender: String,
    condition: String,
    phone: String,
    is_baptized: bool,
    is_serving: bool,
    age_group: String,
    parent_ids: String,
    is_helper_only: bool,
    can_pair_with_non_parent: bool,
    privileges: String,
    privileges_by_section: String,
    availability: String,
    aliases: String,
}

const SELECT_COLUMNS: &str = "id, name, gender, condition, phone, is_baptized, is_serving, \
     age_group, parent_ids, is_helper_only, can_pair_with_non_parent, privileges, \
     privileges_by_section, availability, aliases";

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PublisherRow> {
    Ok(PublisherRow {
        id: row.get(0)?,
        name: row.get(1)?,
        gender: row.get(2)?,
        condition: row.get(3)?,
        phone: row.get(4)?,
        is_baptized: row.get(5)?,
        is_serving: row.get(6)?,
        age_group: row.get(7)?,
        parent_ids: row.get(8)?,
        is_helper_only: row.get(9)?,
        can_pair_with_non_parent: row.get(10)?,
        privileges: row.get(11)?,
        privileges_by_section: row.get(12)?,
        availability: row.get(13)?,
        aliases: row.get(14)?,
    })
}

fn decode_row(raw: PublisherRow) -> RepositoryResult<Publisher> {
    let gender = Gender::parse(&raw.gender).ok_or_else(|| RepositoryError::FieldValueError {
        field: "gender".to_string(),
        message: raw.gender.clone(),
    })?;
    let condition =
        Condition::parse(&raw.condition).ok_or_else(|| RepositoryError::FieldValueError {
            field: "condition".to_string(),
            message: raw.condition.clone(),
        })?;
    let age_group =
        AgeGroup::parse(&raw.age_group).ok_or_else(|| RepositoryError::FieldValueError {
            field: "age_group".to_string(),
            message: raw.age_group.clone(),
        })?;

    let parent_ids: Vec<String> = serde_json::from_str(&raw.parent_ids)?;
    let privileges: PublisherPrivileges = serde_json::from_str(&raw.privileges)?;
    let privileges_by_section: SectionPermissions =
        serde_json::from_str(&raw.privileges_by_section)?;
    let availability: Availability = serde_json::from_str(&raw.availability)?;
    let aliases: Vec<String> = serde_json::from_str(&raw.aliases)?;

    Ok(Publisher {
        id: raw.id,
        name: raw.name,
        gender,
        condition,
        phone: raw.phone,
        is_baptized: raw.is_baptized,
        is_serving: raw.is_serving,
        age_group,
        parent_ids,
        is_helper_only: raw.is_helper_only,
        can_pair_with_non_parent: raw.can_pair_with_non_parent,
        privileges,
        privileges_by_section,
        availability,
        aliases,
    })
}

impl PublisherRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insere ou substitui um publicador.
    pub fn save(&self, publisher: &Publisher) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO publisher (
                id, name, gender, condition, phone, is_baptized, is_serving,
                age_group, parent_ids, is_helper_only, can_pair_with_non_parent,
                privileges, privileges_by_section, availability, aliases
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                publisher.id,
                publisher.name,
                publisher.gender.as_str(),
                publisher.condition.as_str(),
                publisher.phone,
                publisher.is_baptized,
                publisher.is_serving,
                publisher.age_group.as_str(),
                serde_json::to_string(&publisher.parent_ids)?,
                publisher.is_helper_only,
                publisher.can_pair_with_non_parent,
                serde_json::to_string(&publisher.privileges)?,
                serde_json::to_string(&publisher.privileges_by_section)?,
                serde_json::to_string(&publisher.availability)?,
                serde_json::to_string(&publisher.aliases)?,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Publisher>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {SELECT_COLUMNS} FROM publisher WHERE id = ?1"))?;
        let raw = stmt.query_row(params![id], read_row).optional()?;
        raw.map(decode_row).transpose()
    }

    pub fn find_all(&self) -> RepositoryResult<Vec<Publisher>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {SELECT_COLUMNS} FROM publisher ORDER BY name"))?;
        let rows = stmt.query_map([], read_row)?;
        let mut publishers = Vec::new();
        for raw in rows {
            publishers.push(decode_row(raw?)?);
        }
        Ok(publishers)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM publisher WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn delete_all(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM publisher", [])?;
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM publisher", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::types::AvailabilityMode;

    fn sample_publisher() -> Publisher {
        Publisher {
            id: "pub_1".to_string(),
            name: "Eliezer Rosa".to_string(),
            gender: Gender::Brother,
            condition: Condition::Anciao,
            phone: "(21) 99999-0000".to_string(),
            is_baptized: true,
            is_serving: true,
            age_group: AgeGroup::Adulto,
            parent_ids: Vec::new(),
            is_helper_only: false,
            can_pair_with_non_parent: false,
            privileges: PublisherPrivileges {
                can_give_talks: true,
                can_conduct_cbs: true,
                can_read_cbs: true,
                can_pray: true,
                can_preside: true,
            },
            privileges_by_section: SectionPermissions::default(),
            availability: Availability {
                mode: AvailabilityMode::Always,
                exception_dates: vec!["2024-11-07".to_string()],
            },
            aliases: vec!["Eli".to_string()],
        }
    }

    #[test]
    fn test_save_and_find_roundtrip() {
        let repo = PublisherRepository::from_connection(open_in_memory().unwrap());
        let publisher = sample_publisher();
        repo.save(&publisher).unwrap();

        let loaded = repo.find_by_id("pub_1").unwrap().unwrap();
        assert_eq!(loaded, publisher);
        assert!(repo.find_by_id("inexistente").unwrap().is_none());
    }

    #[test]
    fn test_save_is_upsert() {
        let repo = PublisherRepository::from_connection(open_in_memory().unwrap());
        let mut publisher = sample_publisher();
        repo.save(&publisher).unwrap();

        publisher.is_serving = false;
        repo.save(&publisher).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert!(!repo.find_by_id("pub_1").unwrap().unwrap().is_serving);
    }

    #[test]
    fn test_delete_and_delete_all() {
        let repo = PublisherRepository::from_connection(open_in_memory().unwrap());
        repo.save(&sample_publisher()).unwrap();
        repo.delete("pub_1").unwrap();
        assert_eq!(repo.count().unwrap(), 0);

        repo.save(&sample_publisher()).unwrap();
        repo.delete_all().unwrap();
        assert!(repo.find_all().unwrap().is_empty());
    }
}
