// ==========================================
// Designações RVM - Entidade Publicador
// ==========================================
// Pessoa elegível para designações na reunião.
// Campos aninhados (privilégios, disponibilidade) são
// serializados como JSON no banco e no backup.
// ==========================================

use crate::domain::types::{AgeGroup, AvailabilityMode, Condition, Gender, MeetingSection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Privilégios individuais
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherPrivileges {
    pub can_give_talks: bool,
    #[serde(rename = "canConductCBS")]
    pub can_conduct_cbs: bool,
    #[serde(rename = "canReadCBS")]
    pub can_read_cbs: bool,
    pub can_pray: bool,
    pub can_preside: bool,
}

// ==========================================
// Permissões por seção da reunião
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPermissions {
    pub can_participate_in_treasures: bool,
    pub can_participate_in_ministry: bool,
    pub can_participate_in_life: bool,
}

impl Default for SectionPermissions {
    fn default() -> Self {
        Self {
            can_participate_in_treasures: true,
            can_participate_in_ministry: true,
            can_participate_in_life: true,
        }
    }
}

impl SectionPermissions {
    pub fn allows(&self, section: MeetingSection) -> bool {
        match section {
            MeetingSection::Tesouros => self.can_participate_in_treasures,
            MeetingSection::Ministerio => self.can_participate_in_ministry,
            MeetingSection::VidaCrista => self.can_participate_in_life,
        }
    }
}

// ==========================================
// Regra de disponibilidade
// ==========================================
// Datas de exceção no formato ISO (`YYYY-MM-DD`); datas
// malformadas na lista são ignoradas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub mode: AvailabilityMode,
    #[serde(default)]
    pub exception_dates: Vec<String>,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            mode: AvailabilityMode::Always,
            exception_dates: Vec::new(),
        }
    }
}

impl Availability {
    /// Disponibilidade na data da reunião.
    pub fn is_available_on(&self, date: NaiveDate) -> bool {
        let is_exception = self.exception_dates.iter().any(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(|d| d == date)
                .unwrap_or(false)
        });
        match self.mode {
            AvailabilityMode::Always => !is_exception,
            AvailabilityMode::Never => is_exception,
        }
    }
}

// ==========================================
// Publicador
// ==========================================
// Invariante: quando age_group = Criança, parent_ids deve
// referenciar publicadores válidos (referência fraca — a
// exclusão de um responsável não corrompe o histórico).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub condition: Condition,
    #[serde(default)]
    pub phone: String,
    pub is_baptized: bool,
    pub is_serving: bool,
    pub age_group: AgeGroup,
    #[serde(default)]
    pub parent_ids: Vec<String>,
    #[serde(default)]
    pub is_helper_only: bool,
    #[serde(default)]
    pub can_pair_with_non_parent: bool,
    #[serde(default)]
    pub privileges: PublisherPrivileges,
    #[serde(default)]
    pub privileges_by_section: SectionPermissions,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Publisher {
    pub fn is_child(&self) -> bool {
        self.age_group == AgeGroup::Crianca
    }

    pub fn is_guardian_of(&self, child: &Publisher) -> bool {
        child.parent_ids.iter().any(|id| id == &self.id)
    }
}
