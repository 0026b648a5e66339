use std::collections::HashSet;

use anyhow::anyhow;
use rand::Rng;

use crate::errors::AppError;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;
const MAX_CODE_ATTEMPTS: usize = 1_000;

/// Random public certificate code in the form `NNNNNN/YYYY`.
pub fn generate_certificate_code<R: Rng>(year: i32, rng: &mut R) -> String {
    let number = rng.gen_range(CODE_MIN..=CODE_MAX);
    format!("{number}/{year}")
}

/// Draws codes until one is not in `taken`.
pub fn assign_unique_code<R: Rng>(
    year: i32,
    taken: &HashSet<String>,
    rng: &mut R,
) -> Result<String, AppError> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_certificate_code(year, rng);
        if !taken.contains(&code) {
            return Ok(code);
        }
    }
    Err(AppError::Internal(anyhow!(
        "no free certificate code for {year} after {MAX_CODE_ATTEMPTS} attempts"
    )))
}

/// Public link that verifies a certificate, printed as a QR code on the page.
pub fn validation_url(base_url: &str, code: &str) -> String {
    format!("{}/validate?code={}", base_url.trim_end_matches('/'), code)
}
