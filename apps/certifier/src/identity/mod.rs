// Identity documents: CPF checksum validation and input masking.

pub mod cpf;
pub mod phone;

pub use cpf::{clean_cpf, format_cpf, validate_cpf, Cpf};
pub use phone::format_phone;
