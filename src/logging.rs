// ==========================================
// Designações RVM - Inicialização do sistema de logs
// ==========================================
// tracing + tracing-subscriber, com nível controlado por
// variável de ambiente.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Inicializa o sistema de logs.
///
/// # Variáveis de ambiente
/// - RUST_LOG: filtro de nível (padrão: info)
///   Ex.: RUST_LOG=debug ou RUST_LOG=designacoes_rvm=trace
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Inicialização para testes: nível detalhado e escrita
/// compatível com a captura do test harness.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
