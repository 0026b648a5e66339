//! CPF (Cadastro de Pessoas Físicas) checksum validation and masking.
//!
//! A CPF is 11 decimal digits; the last two are check digits computed from
//! the preceding ones with a weighted sum modulo 11. Masked input such as
//! `529.982.247-25` is accepted everywhere because non-digits are stripped
//! before any check.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const CPF_LEN: usize = 11;

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

/// Returns true if `raw`, after stripping non-digits, is a CPF with valid check digits.
///
/// Never fails loudly: empty input, wrong length, input without digits and
/// repeated-digit sequences (`000.000.000-00`, `111.111.111-11`, ...) all yield `false`.
pub fn validate_cpf(raw: &str) -> bool {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != CPF_LEN {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Check digit over `prefix`: weights run from `prefix.len() + 1` down to 2.
fn check_digit(prefix: &[u32]) -> u32 {
    let top_weight = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, &d)| d * (top_weight - i as u32))
        .sum();
    match (sum * 10) % 11 {
        10 | 11 => 0,
        rest => rest,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Masking helpers
// ────────────────────────────────────────────────────────────────────────────

/// Removes every character that is not an ASCII digit.
pub fn clean_cpf(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Applies the `ddd.ddd.ddd-dd` mask progressively, as the user types.
///
/// Input is cleaned and truncated to 11 digits first, so re-formatting an
/// already masked value is a no-op.
pub fn format_cpf(raw: &str) -> String {
    let digits: String = clean_cpf(raw).chars().take(CPF_LEN).collect();
    let n = digits.len();
    match n {
        0..=3 => digits,
        4..=6 => format!("{}.{}", &digits[..3], &digits[3..]),
        7..=9 => format!("{}.{}.{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => format!(
            "{}.{}.{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..]
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validated newtype
// ────────────────────────────────────────────────────────────────────────────

/// A CPF that passed checksum validation, stored as its 11 cleaned digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if validate_cpf(raw) {
            Ok(Cpf(clean_cpf(raw)))
        } else {
            Err(AppError::InvalidCpf(raw.to_string()))
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    pub fn formatted(&self) -> String {
        format_cpf(&self.0)
    }
}

impl TryFrom<String> for Cpf {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cpf::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(value: Cpf) -> Self {
        value.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
