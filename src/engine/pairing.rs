// ==========================================
// Designações RVM - Validador de pareamento
// ==========================================
// Salvaguarda de proteção de menores: restringe quem pode
// atuar como ajudante de um estudante criança. Aplica-se
// apenas às partes do ministério (as únicas pareáveis).
// ==========================================

use crate::domain::publisher::Publisher;
use crate::domain::types::AgeGroup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingCheck {
    pub is_valid: bool,
    pub reason: String,
}

impl PairingCheck {
    fn ok() -> Self {
        Self {
            is_valid: true,
            reason: String::new(),
        }
    }

    fn invalid(reason: &str) -> Self {
        Self {
            is_valid: false,
            reason: reason.to_string(),
        }
    }
}

/// Valida o par (estudante, ajudante). Adultos e jovens nunca
/// são restringidos; para crianças a ordem de verificação é:
/// responsável legal primeiro, depois autorização para
/// terceiros adultos.
pub fn validate_pairing(student: &Publisher, helper: &Publisher) -> PairingCheck {
    if student.age_group == AgeGroup::Crianca {
        let is_parent = helper.is_guardian_of(student);
        let is_adult = helper.age_group == AgeGroup::Adulto;

        if is_parent {
            return PairingCheck::ok();
        }

        if student.can_pair_with_non_parent && is_adult {
            return PairingCheck::ok();
        }

        if !student.can_pair_with_non_parent {
            return PairingCheck::invalid(
                "Crianças só podem ter um dos pais como ajudante. Autorização para terceiros não concedida.",
            );
        }

        if !is_adult {
            return PairingCheck::invalid("O ajudante de uma criança deve ser um adulto.");
        }
    }
    PairingCheck::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::publisher::{Availability, PublisherPrivileges, SectionPermissions};
    use crate::domain::types::{Condition, Gender};

    fn make_publisher(id: &str, age_group: AgeGroup) -> Publisher {
        Publisher {
            id: id.to_string(),
            name: id.to_string(),
            gender: Gender::Sister,
            condition: Condition::Publicador,
            phone: String::new(),
            is_baptized: false,
            is_serving: true,
            age_group,
            parent_ids: Vec::new(),
            is_helper_only: false,
            can_pair_with_non_parent: false,
            privileges: PublisherPrivileges::default(),
            privileges_by_section: SectionPermissions::default(),
            availability: Availability::default(),
            aliases: Vec::new(),
        }
    }

    #[test]
    fn test_child_with_parent_helper_is_valid() {
        let mut child = make_publisher("ana", AgeGroup::Crianca);
        child.parent_ids = vec!["mae_ana".to_string()];
        let parent = make_publisher("mae_ana", AgeGroup::Adulto);

        let check = validate_pairing(&child, &parent);
        assert!(check.is_valid);
        assert!(check.reason.is_empty());
    }

    #[test]
    fn test_child_without_authorization_rejects_third_party() {
        let mut child = make_publisher("ana", AgeGroup::Crianca);
        child.parent_ids = vec!["mae_ana".to_string()];
        let other = make_publisher("vizinha", AgeGroup::Adulto);

        let check = validate_pairing(&child, &other);
        assert!(!check.is_valid);
        assert_eq!(
            check.reason,
            "Crianças só podem ter um dos pais como ajudante. Autorização para terceiros não concedida."
        );
    }

    #[test]
    fn test_authorized_child_accepts_adult_but_not_minor() {
        let mut child = make_publisher("ana", AgeGroup::Crianca);
        child.can_pair_with_non_parent = true;

        let adult = make_publisher("irma_adulta", AgeGroup::Adulto);
        assert!(validate_pairing(&child, &adult).is_valid);

        let teen = make_publisher("jovem", AgeGroup::Jovem);
        let check = validate_pairing(&child, &teen);
        assert!(!check.is_valid);
        assert_eq!(check.reason, "O ajudante de uma criança deve ser um adulto.");
    }

    #[test]
    fn test_parent_beats_missing_authorization() {
        // Responsável legal sempre vale, mesmo sem autorização
        let mut child = make_publisher("ana", AgeGroup::Crianca);
        child.parent_ids = vec!["pai_ana".to_string()];
        child.can_pair_with_non_parent = false;
        let parent = make_publisher("pai_ana", AgeGroup::Adulto);

        assert!(validate_pairing(&child, &parent).is_valid);
    }

    #[test]
    fn test_adults_and_teens_are_unrestricted() {
        let adult = make_publisher("adulta", AgeGroup::Adulto);
        let teen = make_publisher("jovem", AgeGroup::Jovem);
        let child = make_publisher("crianca", AgeGroup::Crianca);

        assert!(validate_pairing(&adult, &child).is_valid);
        assert!(validate_pairing(&teen, &child).is_valid);
        assert!(validate_pairing(&adult, &teen).is_valid);
    }
}
