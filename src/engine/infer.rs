// ==========================================
// Designações RVM - Inferência de tipo de participação
// ==========================================
// Classifica um título de parte em texto livre num tipo
// canônico, por cascata de palavras-chave em ordem de
// especificidade. Total: todo título recebe um tipo, com
// Vida Cristã como fallback.
// ==========================================

use crate::domain::types::ParticipationType;

const TREASURES_KEYWORDS: &[&str] = &[
    "tesouros",
    "pacto",
    "salvador",
    "agradeçam",
    "rei jesus",
    "retribuir",
    "caminho",
    "perseverar",
    "sofrimento",
];

const LIFE_KEYWORDS: &[&str] = &[
    "amor",
    "dinheiro",
    "promessas",
    "necessidades locais",
    "organização",
    "sofrer",
];

/// Cascata sobre o título em minúsculas. A ordem importa:
/// os papéis fixos vêm antes das seções, e "discurso"
/// dentro do bloco do ministério captura os discursos de
/// estudante antes do fallback temático.
pub fn infer_participation_type(part_title: &str) -> ParticipationType {
    let title = part_title.to_lowercase();

    if title.contains("presidente") {
        return ParticipationType::Presidente;
    }
    if title.contains("oração inicial") {
        return ParticipationType::OracaoInicial;
    }
    if title.contains("oração final") {
        return ParticipationType::OracaoFinal;
    }
    if title.contains("cântico") {
        return ParticipationType::Cantico;
    }
    if title.contains("comentários finais") {
        return ParticipationType::ComentariosFinais;
    }
    if title.contains("ajudante") {
        return ParticipationType::Ajudante;
    }

    if title.contains("leitura da bíblia") || title.contains("joias espirituais") {
        return ParticipationType::Tesouros;
    }

    if title.contains("iniciando conversas")
        || title.contains("cultivando o interesse")
        || title.contains("fazendo discípulos")
        || title.contains("explicando suas crenças")
        || title.contains("discurso")
    {
        return ParticipationType::Ministerio;
    }

    if title.contains("estudo bíblico de congregação") {
        return ParticipationType::Dirigente;
    }

    if TREASURES_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return ParticipationType::Tesouros;
    }

    if LIFE_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return ParticipationType::VidaCrista;
    }

    ParticipationType::VidaCrista
}
