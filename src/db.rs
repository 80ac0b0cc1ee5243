// ==========================================
// Designações RVM - Inicialização do banco de dados
// ==========================================
// Abertura explícita do SQLite e criação do esquema.
// Os repositórios compartilham a conexão via Arc<Mutex<_>>.
// Campos aninhados (privilégios, condições, snapshots) são
// gravados como TEXT em JSON.
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// PRAGMAs de sessão aplicados a toda conexão.
fn configure_connection(conn: &Connection) -> RepositoryResult<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
    Ok(())
}

/// Esquema completo do sistema. Idempotente.
fn create_schema(conn: &Connection) -> RepositoryResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS publisher (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            gender TEXT NOT NULL,
            condition TEXT NOT NULL,
            phone TEXT NOT NULL DEFAULT '',
            is_baptized INTEGER NOT NULL,
            is_serving INTEGER NOT NULL,
            age_group TEXT NOT NULL,
            parent_ids TEXT NOT NULL DEFAULT '[]',
            is_helper_only INTEGER NOT NULL DEFAULT 0,
            can_pair_with_non_parent INTEGER NOT NULL DEFAULT 0,
            privileges TEXT NOT NULL,
            privileges_by_section TEXT NOT NULL,
            availability TEXT NOT NULL,
            aliases TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS participation (
            id TEXT PRIMARY KEY,
            publisher_name TEXT NOT NULL,
            week TEXT NOT NULL,
            date TEXT NOT NULL,
            part_title TEXT NOT NULL,
            part_type TEXT NOT NULL,
            duration INTEGER,
            part_order INTEGER,
            part_number INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_participation_week ON participation(week);

        CREATE TABLE IF NOT EXISTS workbook (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            file_data TEXT NOT NULL,
            upload_date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS rule (
            id TEXT PRIMARY KEY,
            description TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            conditions TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS special_event (
            id TEXT PRIMARY KEY,
            week TEXT NOT NULL,
            template_id TEXT NOT NULL,
            theme TEXT NOT NULL DEFAULT '',
            assigned_to TEXT NOT NULL DEFAULT '',
            duration INTEGER NOT NULL,
            configuration TEXT NOT NULL DEFAULT '{}'
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_special_event_week ON special_event(week);

        CREATE TABLE IF NOT EXISTS event_template (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            impact TEXT NOT NULL,
            defaults TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS history_backup (
            id TEXT PRIMARY KEY,
            week TEXT NOT NULL UNIQUE,
            participations TEXT NOT NULL,
            imported_at TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
    Ok(())
}

/// Abre (criando se preciso) o banco no caminho dado, configura a
/// conexão e garante o esquema.
pub fn open_database(path: impl AsRef<Path>) -> RepositoryResult<Arc<Mutex<Connection>>> {
    let path = path.as_ref();
    let conn = Connection::open(path)
        .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
    configure_connection(&conn)?;
    create_schema(&conn)?;
    info!(caminho = %path.display(), "banco de dados aberto");
    Ok(Arc::new(Mutex::new(conn)))
}

/// Banco em memória para testes.
pub fn open_in_memory() -> RepositoryResult<Arc<Mutex<Connection>>> {
    let conn = Connection::open_in_memory()
        .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
    configure_connection(&conn)?;
    create_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}
