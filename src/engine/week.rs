// ==========================================
// Designações RVM - Normalizador de semanas e datas
// ==========================================
// Rótulos de semana em texto livre ("4-10 de NOV, 2024",
// "Semana de 3 a 9 de março", ...) viram um rótulo
// canônico e uma data ordenável. A data da reunião segue a
// regra bienal: quarta-feira em ano ímpar, quinta em ano par.
// ==========================================
// Falha suave: formato desconhecido passa adiante com o ano
// anexado; peças ausentes produzem a sentinela época-zero,
// que os chamadores nunca tratam como data real.
// ==========================================

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Abreviações canônicas dos meses, em maiúsculas.
pub const MONTH_ABBR: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

/// Mês (1..=12) a partir de abreviação ou nome completo em português.
fn month_from_name(token: &str) -> Option<u32> {
    match token {
        "JAN" | "JANEIRO" => Some(1),
        "FEV" | "FEVEREIRO" => Some(2),
        "MAR" | "MARÇO" | "MARCO" => Some(3),
        "ABR" | "ABRIL" => Some(4),
        "MAI" | "MAIO" => Some(5),
        "JUN" | "JUNHO" => Some(6),
        "JUL" | "JULHO" => Some(7),
        "AGO" | "AGOSTO" => Some(8),
        "SET" | "SETEMBRO" => Some(9),
        "OUT" | "OUTUBRO" => Some(10),
        "NOV" | "NOVEMBRO" => Some(11),
        "DEZ" | "DEZEMBRO" => Some(12),
        _ => None,
    }
}

/// Abreviação de 3 letras a partir de um nome de mês qualquer.
/// Nomes desconhecidos degradam para os 3 primeiros caracteres.
fn month_abbr(name: &str) -> String {
    let upper = name.to_uppercase();
    match month_from_name(&upper) {
        Some(m) => MONTH_ABBR[(m - 1) as usize].to_string(),
        None => upper.chars().take(3).collect(),
    }
}

fn split_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s+DE\s+([A-ZÇ]+)\s*-\s*(\d+)\s+DE\s+([A-ZÇ]+)").unwrap()
    })
}

fn single_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*(?:-|A)\s*(\d+)\s+(?:DE\s+)?([A-ZÇ]+)").unwrap())
}

fn week_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^SEMANA\s+(DE\s+)?").unwrap())
}

fn four_digit_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}").unwrap())
}

fn workbook_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\w+)/(\w+)\s+(\d{4})").unwrap())
}

/// Data sentinela para "desconhecido/inválido".
pub fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("data fixa válida")
}

/// Instante sentinela correspondente.
pub fn epoch_instant() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().expect("instante fixo válido")
}

pub fn is_epoch_date(date: NaiveDate) -> bool {
    date == epoch_date()
}

pub fn is_epoch_instant(instant: DateTime<Utc>) -> bool {
    instant.timestamp() == 0
}

/// Normaliza um rótulo de semana em texto livre para a forma canônica
/// com ano. Rótulos já canônicos (ano de 4 dígitos + vírgula) passam
/// intocados; formatos desconhecidos passam com o ano anexado.
pub fn standardize_week_date(raw: &str, year_context: i32) -> String {
    if raw.trim().is_empty() {
        return format!("Semana Indefinida, {year_context}");
    }

    let mut cleaned = week_prefix_re()
        .replace(&raw.to_uppercase(), "")
        .trim()
        .to_string();

    if four_digit_year_re().is_match(&cleaned) && cleaned.contains(',') {
        return cleaned;
    }

    cleaned = cleaned.replace('–', "-");

    if let Some(caps) = split_month_re().captures(&cleaned) {
        let day1 = &caps[1];
        let m1 = month_abbr(&caps[2]);
        let day2 = &caps[3];
        let m2 = month_abbr(&caps[4]);

        // Virada de ano: a segunda metade de DEZ-JAN cai no ano seguinte
        if m1 == "DEZ" && m2 == "JAN" {
            return format!(
                "{day1} de {m1}, {year_context} - {day2} de {m2}, {}",
                year_context + 1
            );
        }
        return format!("{day1} de {m1} - {day2} de {m2}, {year_context}");
    }

    if let Some(caps) = single_month_re().captures(&cleaned) {
        let day1 = &caps[1];
        let day2 = &caps[2];
        let m = month_abbr(&caps[3]);
        return format!("{day1}-{day2} de {m}, {year_context}");
    }

    if !cleaned.contains(&year_context.to_string()) {
        return format!("{cleaned}, {year_context}");
    }

    cleaned
}

/// Extrai a data de início (dia/mês/ano) de um rótulo de semana.
/// Retorna a sentinela época-zero quando qualquer peça falta.
pub fn parse_week_date(week: &str) -> NaiveDate {
    if week.trim().is_empty() {
        return epoch_date();
    }

    let cleaned = week.replace(',', " ").to_uppercase();
    let tokens: Vec<&str> = cleaned
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|t| !t.is_empty())
        .collect();

    // Primeiro token numérico plausível como dia do mês
    let day = tokens
        .iter()
        .filter_map(|t| t.parse::<u32>().ok())
        .find(|d| (1..=31).contains(d));
    let Some(day) = day else {
        return epoch_date();
    };

    // Primeiro token que é nome/abreviação de mês
    let Some(month) = tokens.iter().find_map(|t| month_from_name(t)) else {
        return epoch_date();
    };

    // Ano: token no intervalo (2000, 2100); senão, o último token se plausível
    let mut year = tokens
        .iter()
        .filter_map(|t| t.parse::<i32>().ok())
        .find(|y| *y > 2000 && *y < 2100);
    if year.is_none() {
        if let Some(last) = tokens.last().and_then(|t| t.parse::<i32>().ok()) {
            if last > 2000 {
                year = Some(last);
            }
        }
    }
    let Some(year) = year else {
        return epoch_date();
    };

    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(epoch_date)
}

/// Data real da reunião de uma semana, pela regra bienal:
/// quarta-feira (índice 3) em ano ímpar, quinta (índice 4) em ano par,
/// contada a partir do início da semana no rótulo.
pub fn calculate_part_date(week: &str) -> DateTime<Utc> {
    let start = parse_week_date(week);
    if is_epoch_date(start) {
        return epoch_instant();
    }

    let target_day_of_week: i64 = if start.year() % 2 != 0 { 3 } else { 4 };
    let meeting = start + Duration::days(target_day_of_week - 1);

    Utc.from_utc_datetime(&meeting.and_hms_opt(0, 0, 0).expect("meia-noite válida"))
}

/// Segunda-feira da semana que contém a data dada.
fn first_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Rótulo canônico do intervalo de 7 dias iniciado em `start`.
fn format_date_range(start: NaiveDate) -> String {
    let end = start + Duration::days(6);
    let (d1, d2) = (start.day(), end.day());
    let m1 = MONTH_ABBR[(start.month() - 1) as usize];
    let m2 = MONTH_ABBR[(end.month() - 1) as usize];
    let (y1, y2) = (start.year(), end.year());

    if m1 == m2 {
        format!("{d1}-{d2} de {m1}, {y1}")
    } else if y1 == y2 {
        format!("{d1} de {m1} - {d2} de {m2}, {y1}")
    } else {
        format!("{d1} de {m1}, {y1} - {d2} de {m2}, {y2}")
    }
}

/// Enumera as semanas (ancoradas na segunda-feira) cobertas por uma
/// apostila nomeada no padrão `"MÊS/MÊS AAAA"`. Nomes fora do padrão
/// produzem lista vazia.
pub fn generate_weeks_for_workbook(workbook_name: &str) -> Vec<String> {
    let Some(caps) = workbook_range_re().captures(workbook_name) else {
        return Vec::new();
    };

    let year: i32 = match caps[3].parse() {
        Ok(y) => y,
        Err(_) => return Vec::new(),
    };
    let Some(start_month) = month_from_name(&caps[1].to_uppercase()) else {
        return Vec::new();
    };
    let Some(end_month) = month_from_name(&caps[2].to_uppercase()) else {
        return Vec::new();
    };

    let Some(start_date) = NaiveDate::from_ymd_opt(year, start_month, 1) else {
        return Vec::new();
    };
    // Último dia do mês final: véspera do primeiro dia do mês seguinte
    let first_of_next = if end_month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, end_month + 1, 1)
    };
    let Some(end_date) = first_of_next.map(|d| d - Duration::days(1)) else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    let mut monday = first_monday(start_date);
    while monday <= end_date {
        weeks.push(format_date_range(monday));
        monday += Duration::days(7);
    }
    weeks
}
