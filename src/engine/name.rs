// ==========================================
// Designações RVM - Normalizador de nomes
// ==========================================
// Chave de junção entre nomes em texto livre do histórico
// e os publicadores cadastrados (incluindo apelidos).
// Função pura e total: nunca falha.
// ==========================================

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Minúsculas + decomposição NFD + remoção de marcas
/// combinantes: "José" e "jose" produzem a mesma chave.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
