// ==========================================
// Designações RVM - Ponto de entrada
// ==========================================
// Sequência explícita de inicialização: logs → banco →
// semeadura idempotente → restauração de semanas ausentes →
// passo de reparo de integridade → resumo. Nada de
// temporizadores implícitos nem singletons preguiçosos.
// ==========================================

use anyhow::Context;
use designacoes_rvm::api::SchedulingApi;
use designacoes_rvm::db::open_database;
use designacoes_rvm::repository::{
    seed_defaults, HistoryBackupRepository, ParticipationRepository, PublisherRepository,
};
use tracing::info;

fn database_path() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DESIGNACOES_DB").ok())
        .unwrap_or_else(|| "designacoes.db".to_string())
}

fn main() -> anyhow::Result<()> {
    designacoes_rvm::logging::init();

    info!("==================================================");
    info!("{} - v{}", designacoes_rvm::APP_NAME, designacoes_rvm::VERSION);
    info!("==================================================");

    let db_path = database_path();
    let conn = open_database(&db_path)
        .with_context(|| format!("não foi possível abrir o banco em '{db_path}'"))?;

    let seeded = seed_defaults(&conn).context("falha na semeadura de dados padrão")?;
    if seeded.rules_seeded > 0 || seeded.templates_seeded > 0 {
        info!(
            regras = seeded.rules_seeded,
            modelos = seeded.templates_seeded,
            "primeira execução: dados padrão semeados"
        );
    }

    let history = HistoryBackupRepository::from_connection(conn.clone());
    let restored = history
        .restore_missing()
        .context("falha ao restaurar semanas ausentes do backup")?;
    if restored > 0 {
        info!(semanas = restored, "semanas restauradas do backup");
    }

    let scheduling = SchedulingApi::from_connection(conn.clone());
    let repaired = scheduling
        .repair_pass()
        .context("falha no passo de reparo de integridade")?;
    if repaired > 0 {
        info!(registros = repaired, "registros de histórico reparados");
    }

    let publishers = PublisherRepository::from_connection(conn.clone());
    let participations = ParticipationRepository::from_connection(conn);
    info!(
        publicadores = publishers.count()?,
        participacoes = participations.count()?,
        backups = history.count()?,
        "inicialização concluída"
    );

    Ok(())
}
