use super::cpf::clean_cpf;

const PHONE_MAX_DIGITS: usize = 11;

/// Masks a Brazilian phone number as the user types.
///
/// `11987654321` → `(11) 98765-4321` (mobile); ten digits use the landline
/// split `(11) 3456-7890`. Shorter input is masked progressively and anything
/// past eleven digits is dropped.
pub fn format_phone(raw: &str) -> String {
    let digits: String = clean_cpf(raw).chars().take(PHONE_MAX_DIGITS).collect();
    match digits.len() {
        0..=2 => digits,
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}
