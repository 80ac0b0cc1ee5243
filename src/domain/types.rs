// ==========================================
// Designações RVM - Tipos do domínio
// ==========================================
// Enums fechados usados em todo o sistema.
// Serialização alinhada ao formato de backup JSON
// (valores legíveis em português, como no histórico).
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Tipo de participação (Participation Type)
// ==========================================
// Conjunto fechado: cada parte da reunião pertence a
// exatamente uma destas categorias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipationType {
    #[serde(rename = "Presidente")]
    Presidente,
    #[serde(rename = "Oração Inicial")]
    OracaoInicial,
    #[serde(rename = "Oração Final")]
    OracaoFinal,
    #[serde(rename = "Tesouros da Palavra de Deus")]
    Tesouros,
    #[serde(rename = "Faça Seu Melhor no Ministério")]
    Ministerio,
    #[serde(rename = "Nossa Vida Cristã")]
    VidaCrista,
    #[serde(rename = "Dirigente do EBC")]
    Dirigente,
    #[serde(rename = "Leitor do EBC")]
    Leitor,
    #[serde(rename = "Ajudante")]
    Ajudante,
    #[serde(rename = "Cântico")]
    Cantico,
    #[serde(rename = "Comentários Finais")]
    ComentariosFinais,
}

impl fmt::Display for ParticipationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ParticipationType {
    /// Forma textual canônica (a mesma do backup JSON e do banco).
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationType::Presidente => "Presidente",
            ParticipationType::OracaoInicial => "Oração Inicial",
            ParticipationType::OracaoFinal => "Oração Final",
            ParticipationType::Tesouros => "Tesouros da Palavra de Deus",
            ParticipationType::Ministerio => "Faça Seu Melhor no Ministério",
            ParticipationType::VidaCrista => "Nossa Vida Cristã",
            ParticipationType::Dirigente => "Dirigente do EBC",
            ParticipationType::Leitor => "Leitor do EBC",
            ParticipationType::Ajudante => "Ajudante",
            ParticipationType::Cantico => "Cântico",
            ParticipationType::ComentariosFinais => "Comentários Finais",
        }
    }

    /// Converte a forma textual canônica de volta ao enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Presidente" => Some(ParticipationType::Presidente),
            "Oração Inicial" => Some(ParticipationType::OracaoInicial),
            "Oração Final" => Some(ParticipationType::OracaoFinal),
            "Tesouros da Palavra de Deus" => Some(ParticipationType::Tesouros),
            "Faça Seu Melhor no Ministério" => Some(ParticipationType::Ministerio),
            "Nossa Vida Cristã" => Some(ParticipationType::VidaCrista),
            "Dirigente do EBC" => Some(ParticipationType::Dirigente),
            "Leitor do EBC" => Some(ParticipationType::Leitor),
            "Ajudante" => Some(ParticipationType::Ajudante),
            "Cântico" => Some(ParticipationType::Cantico),
            "Comentários Finais" => Some(ParticipationType::ComentariosFinais),
            _ => None,
        }
    }

    /// Seção da reunião à qual o tipo pertence, quando houver.
    /// Presidência, orações, cânticos e comentários finais não são
    /// controlados por permissão de seção.
    pub fn section(&self) -> Option<MeetingSection> {
        match self {
            ParticipationType::Tesouros => Some(MeetingSection::Tesouros),
            ParticipationType::Ministerio | ParticipationType::Ajudante => {
                Some(MeetingSection::Ministerio)
            }
            ParticipationType::VidaCrista
            | ParticipationType::Dirigente
            | ParticipationType::Leitor => Some(MeetingSection::VidaCrista),
            _ => None,
        }
    }

    /// Partes do ministério recebem ajudante.
    pub fn requires_helper(&self) -> bool {
        matches!(self, ParticipationType::Ministerio)
    }
}

// ==========================================
// Seção da reunião (Meeting Section)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingSection {
    Tesouros,
    Ministerio,
    VidaCrista,
}

impl fmt::Display for MeetingSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingSection::Tesouros => write!(f, "Tesouros"),
            MeetingSection::Ministerio => write!(f, "Ministério"),
            MeetingSection::VidaCrista => write!(f, "Vida Cristã"),
        }
    }
}

// ==========================================
// Gênero (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "brother")]
    Brother,
    #[serde(rename = "sister")]
    Sister,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Brother => "brother",
            Gender::Sister => "sister",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "brother" => Some(Gender::Brother),
            "sister" => Some(Gender::Sister),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Condição congregacional (Condition)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Ancião")]
    Anciao,
    #[serde(rename = "Servo Ministerial")]
    ServoMinisterial,
    #[serde(rename = "Publicador")]
    Publicador,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Anciao => "Ancião",
            Condition::ServoMinisterial => "Servo Ministerial",
            Condition::Publicador => "Publicador",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Ancião" => Some(Condition::Anciao),
            "Servo Ministerial" => Some(Condition::ServoMinisterial),
            "Publicador" => Some(Condition::Publicador),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Faixa etária (Age Group)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "Adulto")]
    Adulto,
    #[serde(rename = "Jovem")]
    Jovem,
    #[serde(rename = "Criança")]
    Crianca,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Adulto => "Adulto",
            AgeGroup::Jovem => "Jovem",
            AgeGroup::Crianca => "Criança",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Adulto" => Some(AgeGroup::Adulto),
            "Jovem" => Some(AgeGroup::Jovem),
            "Criança" => Some(AgeGroup::Crianca),
            _ => None,
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Modo de disponibilidade (Availability Mode)
// ==========================================
// `always`: disponível, exceto nas datas de exceção.
// `never`: indisponível, exceto nas datas de exceção.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityMode {
    Always,
    Never,
}

// ==========================================
// Operador de regra (Rule Operator)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleOperator {
    Equal,
    NotEqual,
    In,
    NotIn,
    Contains,
}

// ==========================================
// Ação de impacto de evento (Event Impact Action)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventImpactAction {
    ReplacePart,
    AddPart,
    ReplaceSection,
    ReassignPart,
}

impl fmt::Display for EventImpactAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventImpactAction::ReplacePart => write!(f, "REPLACE_PART"),
            EventImpactAction::AddPart => write!(f, "ADD_PART"),
            EventImpactAction::ReplaceSection => write!(f, "REPLACE_SECTION"),
            EventImpactAction::ReassignPart => write!(f, "REASSIGN_PART"),
        }
    }
}

// ==========================================
// Discriminante de entidade (Entity Kind)
// ==========================================
// Despacho de exclusão/classificação por discriminante
// explícito, nunca por sondagem de campos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntityKind {
    Publisher { id: String },
    Participation { id: String },
    Workbook { id: String },
    Rule { id: String },
    SpecialEvent { id: String },
    EventTemplate { id: String },
    Week { week: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participation_type_roundtrip() {
        let all = [
            ParticipationType::Presidente,
            ParticipationType::OracaoInicial,
            ParticipationType::OracaoFinal,
            ParticipationType::Tesouros,
            ParticipationType::Ministerio,
            ParticipationType::VidaCrista,
            ParticipationType::Dirigente,
            ParticipationType::Leitor,
            ParticipationType::Ajudante,
            ParticipationType::Cantico,
            ParticipationType::ComentariosFinais,
        ];
        for t in all {
            assert_eq!(ParticipationType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ParticipationType::parse("Inexistente"), None);
    }

    #[test]
    fn test_sections() {
        assert_eq!(
            ParticipationType::Leitor.section(),
            Some(MeetingSection::VidaCrista)
        );
        assert_eq!(
            ParticipationType::Ajudante.section(),
            Some(MeetingSection::Ministerio)
        );
        assert_eq!(ParticipationType::Presidente.section(), None);
        assert!(ParticipationType::Ministerio.requires_helper());
        assert!(!ParticipationType::Tesouros.requires_helper());
    }

    #[test]
    fn test_serde_uses_portuguese_labels() {
        let json = serde_json::to_string(&ParticipationType::Tesouros).unwrap();
        assert_eq!(json, "\"Tesouros da Palavra de Deus\"");
        let back: ParticipationType = serde_json::from_str("\"Oração Inicial\"").unwrap();
        assert_eq!(back, ParticipationType::OracaoInicial);
    }

    #[test]
    fn test_entity_kind_tagged() {
        let kind = EntityKind::Week {
            week: "4-10 de NOV, 2024".to_string(),
        };
        let json = serde_json::to_string(&kind).unwrap();
        assert!(json.contains("\"kind\":\"week\""));
    }
}
