// ==========================================
// Teste de integração dos repositórios
// ==========================================
// Comportamentos que atravessam mais de uma tabela no
// mesmo arquivo SQLite: histórico desnormalizado, backup e
// restauração, regras desligáveis afetando a proposta.
// ==========================================


use designacoes_rvm::api::SchedulingApi;
use designacoes_rvm::domain::types::{Condition, Gender, ParticipationType};
use designacoes_rvm::engine::week::calculate_part_date;
use designacoes_rvm::repository::{
    seed_defaults, HistoryBackupRepository, ParticipationRepository, PublisherRepository,
    RuleRepository,
};
use designacoes_rvm::Participation;
use test_helpers::{create_test_db, make_publisher, sample_congregation};

const WEEK: &str = "4-10 de NOV, 2024";

#[test]
fn test_deleting_publisher_keeps_history_by_value() {
    let (_file, conn) = create_test_db();
    let publishers = PublisherRepository::from_connection(conn.clone());
    let participations = ParticipationRepository::from_connection(conn.clone());

    let p = make_publisher("Samuel Almeida", Gender::Brother, Condition::Publicador);
    publishers.save(&p).unwrap();
    participations
        .save(&Participation::new(
            "Samuel Almeida",
            WEEK,
            calculate_part_date(WEEK),
            "Leitura da Bíblia",
            ParticipationType::Tesouros,
        ))
        .unwrap();

    // O nome é desnormalizado: excluir o publicador não toca o histórico
    publishers.delete(&p.id).unwrap();
    let remaining = participations.find_by_week(WEEK).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].publisher_name, "Samuel Almeida");
}

#[test]
fn test_restore_missing_after_accidental_clear() {
    let (_file, conn) = create_test_db();
    seed_defaults(&conn).unwrap();
    let publishers = PublisherRepository::from_connection(conn.clone());
    for p in sample_congregation() {
        publishers.save(&p).unwrap();
    }

    let api = SchedulingApi::from_connection(conn.clone());
    let proposal = api.propose_week(WEEK).unwrap();
    let confirmed = api.confirm_proposal(&proposal).unwrap();

    // Perda acidental só das participações (o backup sobrevive)
    let participations = ParticipationRepository::from_connection(conn.clone());
    participations.delete_all().unwrap();

    let history = HistoryBackupRepository::from_connection(conn);
    assert_eq!(history.restore_missing().unwrap(), 1);
    assert_eq!(participations.find_by_week(WEEK).unwrap().len(), confirmed.len());
}

#[test]
fn test_deactivated_rule_stops_blocking_proposals() {
    let (_file, conn) = create_test_db();
    seed_defaults(&conn).unwrap();
    let publishers = PublisherRepository::from_connection(conn.clone());
    // Nenhum ancião: com a regra ativa, o EBC fica sem dirigente
    publishers
        .save(&make_publisher(
            "Samuel Almeida",
            Gender::Brother,
            Condition::Publicador,
        ))
        .unwrap();

    let api = SchedulingApi::from_connection(conn.clone());
    let before = api.propose_week(WEEK).unwrap();
    let cbs = before
        .assignments
        .iter()
        .find(|a| a.part.part_type == ParticipationType::Dirigente)
        .unwrap();
    assert!(cbs.needs_attention);

    // Desliga a regra do dirigente; regra inativa nunca é avaliada
    let rules = RuleRepository::from_connection(conn);
    let mut all = rules.find_all().unwrap();
    for rule in all.iter_mut() {
        if rule.description.contains("dirigir o Estudo Bíblico") {
            rule.is_active = false;
            rules.save(rule).unwrap();
        }
    }

    let after = api.propose_week(WEEK).unwrap();
    let cbs = after
        .assignments
        .iter()
        .find(|a| a.part.part_type == ParticipationType::Dirigente)
        .unwrap();
    assert_eq!(cbs.assignee.as_deref(), Some("Samuel Almeida"));
}

#[test]
fn test_historical_import_then_rotation_prefers_fresh_publisher() {
    let (_file, conn) = create_test_db();
    seed_defaults(&conn).unwrap();
    let publishers = PublisherRepository::from_connection(conn.clone());
    for p in sample_congregation() {
        publishers.save(&p).unwrap();
    }
    // Congregação um pouco maior, para o rodízio ter folga
    publishers
        .save(&make_publisher(
            "André Souza",
            Gender::Brother,
            Condition::Publicador,
        ))
        .unwrap();

    let api = SchedulingApi::from_connection(conn);
    // Histórico antigo: Samuel leu a Bíblia recentemente
    api.import_historical(
        vec![designacoes_rvm::api::HistoricalRow {
            week: "28 de OUT - 3 de NOV".to_string(),
            publisher_name: "samuel almeida".to_string(),
            part_title: "Leitura da Bíblia".to_string(),
            part_type: None,
            duration: Some(4),
        }],
        2024,
    )
    .unwrap();

    let proposal = api.propose_week(WEEK).unwrap();
    let leitura = proposal
        .assignments
        .iter()
        .find(|a| a.part.title == "Leitura da Bíblia")
        .unwrap();
    // Rodízio: quem acabou de participar não repete
    assert_ne!(leitura.assignee.as_deref(), Some("Samuel Almeida"));
}
