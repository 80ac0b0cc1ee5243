// ==========================================
// Designações RVM - Reparo de integridade do histórico
// ==========================================
// Passo de reparo explícito e puro sobre participações:
// re-padroniza rótulos de semana antigos (sem ano ou com o
// prefixo "SEMANA DE") e recalcula datas inválidas ou na
// época zero a partir da semana já reparada. Nunca é fatal:
// o que não dá para reparar permanece como está.
// ==========================================

use crate::domain::participation::Participation;
use crate::engine::week::{calculate_part_date, is_epoch_instant, standardize_week_date};
use chrono::Datelike;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

fn century_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(20\d{2})").unwrap())
}

fn any_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}").unwrap())
}

/// Repara uma participação no lugar; `true` se algo mudou.
pub fn repair_participation(p: &mut Participation) -> bool {
    let mut changed = false;

    // Contexto de ano: o ano 20xx presente no rótulo, ou 2024
    let year_context = century_year_re()
        .captures(&p.week)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or(2024);

    if !any_year_re().is_match(&p.week) || p.week.to_uppercase().contains("SEMANA DE") {
        let repaired = standardize_week_date(&p.week, year_context);
        if repaired != p.week {
            debug!(antes = %p.week, depois = %repaired, "rótulo de semana reparado");
            p.week = repaired;
            changed = true;
        }
    }

    if is_epoch_instant(p.date) || p.date.year() <= 1970 {
        let recomputed = calculate_part_date(&p.week);
        if recomputed != p.date && !is_epoch_instant(recomputed) {
            debug!(
                semana = %p.week,
                data = %recomputed.format("%Y-%m-%d"),
                "data de participação recalculada"
            );
            p.date = recomputed;
            changed = true;
        }
    }

    changed
}

/// Repara todas as participações de um lote; devolve quantas
/// foram alteradas.
pub fn repair_participations(participations: &mut [Participation]) -> usize {
    let mut repaired = 0usize;
    for p in participations.iter_mut() {
        if repair_participation(p) {
            repaired += 1;
        }
    }
    if repaired > 0 {
        info!(corrigidos = repaired, "integridade do histórico verificada");
    }
    repaired
}
