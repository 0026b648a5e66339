//! Portuguese wording of the certificate sentence.

use chrono::{Datelike, NaiveDate};

use crate::identity::format_cpf;
use crate::layout::StyledRun;
use crate::models::{Attendee, Event};

/// Feminine cardinals, since they qualify "horas".
const CARDINALS: [&str; 21] = [
    "zero",
    "uma",
    "duas",
    "três",
    "quatro",
    "cinco",
    "seis",
    "sete",
    "oito",
    "nove",
    "dez",
    "onze",
    "doze",
    "treze",
    "quatorze",
    "quinze",
    "dezesseis",
    "dezessete",
    "dezoito",
    "dezenove",
    "vinte",
];

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// `4` → `4 (quatro)`. Values above twenty repeat the number: `24 (24)`.
pub fn workload_text(hours: u32) -> String {
    match CARDINALS.get(hours as usize) {
        Some(words) => format!("{hours} ({words})"),
        None => format!("{hours} ({hours})"),
    }
}

/// `2026-02-02` → `02 de fevereiro de 2026`.
pub fn long_date_pt_br(date: NaiveDate) -> String {
    format!(
        "{:02} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Builds the certificate paragraph. Variable parts are bold; punctuation that
/// follows them sits in the next normal run with no space in between.
pub fn certificate_runs(attendee: &Attendee, event: &Event) -> Vec<StyledRun> {
    vec![
        StyledRun::normal("Certificamos que "),
        StyledRun::bold(attendee.full_name.trim()),
        StyledRun::normal(", inscrito(a) no CPF nº "),
        StyledRun::bold(format_cpf(&attendee.cpf)),
        StyledRun::normal(", participou do Encontro Pedagógico com o tema \""),
        StyledRun::bold(event.title.trim()),
        StyledRun::normal("\", com carga horária de "),
        StyledRun::bold(format!("{} horas", workload_text(event.workload))),
        StyledRun::normal(", realizado no dia "),
        StyledRun::bold(long_date_pt_br(event.date)),
        StyledRun::normal("."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_attendee() -> Attendee {
        Attendee {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            full_name: "Maria da Silva".to_string(),
            cpf: "52998224725".to_string(),
            phone: "(11) 98765-4321".to_string(),
        }
    }

    fn make_event() -> Event {
        Event {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: "Educação Inclusiva".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            location: Some("Auditório".to_string()),
            is_open: true,
            workload: 4,
            certificates_released: true,
            certificate_template_url: None,
        }
    }

    #[test]
    fn test_workload_text_uses_feminine_cardinals() {
        assert_eq!(workload_text(0), "0 (zero)");
        assert_eq!(workload_text(1), "1 (uma)");
        assert_eq!(workload_text(2), "2 (duas)");
        assert_eq!(workload_text(4), "4 (quatro)");
        assert_eq!(workload_text(20), "20 (vinte)");
    }

    #[test]
    fn test_workload_text_above_twenty_repeats_number() {
        assert_eq!(workload_text(24), "24 (24)");
    }

    #[test]
    fn test_long_date_pt_br() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        assert_eq!(long_date_pt_br(date), "02 de fevereiro de 2026");
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(long_date_pt_br(date), "15 de março de 2025");
    }

    #[test]
    fn test_certificate_runs_sentence() {
        let runs = certificate_runs(&make_attendee(), &make_event());
        let sentence: String = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            sentence,
            "Certificamos que Maria da Silva, inscrito(a) no CPF nº 529.982.247-25, \
             participou do Encontro Pedagógico com o tema \"Educação Inclusiva\", \
             com carga horária de 4 (quatro) horas, realizado no dia 02 de fevereiro de 2026."
        );
    }

    #[test]
    fn test_certificate_runs_bold_variable_parts() {
        let runs = certificate_runs(&make_attendee(), &make_event());
        let bold: Vec<&str> = runs
            .iter()
            .filter(|r| r.bold)
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(
            bold,
            vec![
                "Maria da Silva",
                "529.982.247-25",
                "Educação Inclusiva",
                "4 (quatro) horas",
                "02 de fevereiro de 2026",
            ]
        );
    }
}
