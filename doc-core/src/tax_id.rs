//! CPF / CNPJ helpers: digit extraction, input masking and check digits.
//!
//! A CPF identifies a person (11 digits, `000.000.000-00`); a CNPJ
//! identifies a company (14 digits, `00.000.000/0000-00`). Both end in two
//! modulo-11 check digits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CPF_LEN: usize = 11;
pub const CNPJ_LEN: usize = 14;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxIdError {
    #[error("CPF/CNPJ must have 11 or 14 digits, got {0}")]
    InvalidLength(usize),

    #[error("CPF/CNPJ cannot repeat a single digit")]
    RepeatedDigits,

    #[error("CPF/CNPJ check digits do not match")]
    CheckDigitMismatch,
}

/// A validated taxpayer id, stored as digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxId {
    Cpf(String),
    Cnpj(String),
}

impl TaxId {
    /// Parses and validates a CPF or CNPJ in any punctuation.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        let digits = digits(s);
        let values: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

        let weights_first: &[u32] = match values.len() {
            CPF_LEN => &[10, 9, 8, 7, 6, 5, 4, 3, 2],
            CNPJ_LEN => &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2],
            n => return Err(TaxIdError::InvalidLength(n)),
        };
        if values.iter().all(|d| *d == values[0]) {
            return Err(TaxIdError::RepeatedDigits);
        }

        let body = weights_first.len();
        let first = check_digit(&values[..body], weights_first);
        let weights_second: Vec<u32> = match values.len() {
            CPF_LEN => (2..=11).rev().collect(),
            _ => [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2].to_vec(),
        };
        let second = check_digit(&values[..=body], &weights_second);

        if values[body] != first || values[body + 1] != second {
            return Err(TaxIdError::CheckDigitMismatch);
        }

        Ok(if values.len() == CPF_LEN {
            Self::Cpf(digits)
        } else {
            Self::Cnpj(digits)
        })
    }

    pub fn digits(&self) -> &str {
        match self {
            Self::Cpf(d) | Self::Cnpj(d) => d,
        }
    }

    pub fn formatted(&self) -> String {
        mask(self.digits())
    }
}

impl std::fmt::Display for TaxId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

fn check_digit(
    values: &[u32],
    weights: &[u32],
) -> u32 {
    let sum: u32 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    let digit = 11 - (sum % 11);
    if digit >= 10 { 0 } else { digit }
}

/// Strips every non-digit character.
pub fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Applies the CPF or CNPJ mask while the user types.
///
/// Input is capped at 14 digits. Up to 11 digits is treated as a CPF and
/// longer input as a CNPJ; until the id is complete the bare digits are
/// returned.
pub fn mask(s: &str) -> String {
    let d: String = digits(s).chars().take(CNPJ_LEN).collect();
    match d.len() {
        CPF_LEN => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
        CNPJ_LEN => format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..]
        ),
        _ => d,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn digits_strips_punctuation() {
        assert_eq!(digits("529.982.247-25"), "52998224725");
        assert_eq!(digits(" a1b2 "), "12");
    }

    #[test]
    fn mask_formats_complete_ids() {
        assert_eq!(mask("52998224725"), "529.982.247-25");
        assert_eq!(mask("11222333000181"), "11.222.333/0001-81");
    }

    #[test]
    fn mask_leaves_partial_input_as_digits() {
        assert_eq!(mask("529.98"), "52998");
        assert_eq!(mask("112223330001"), "112223330001");
    }

    #[test]
    fn mask_caps_input_at_fourteen_digits() {
        assert_eq!(mask("112223330001819999"), "11.222.333/0001-81");
    }

    #[test]
    fn parse_accepts_valid_cpf_and_cnpj() {
        assert_eq!(
            TaxId::parse("529.982.247-25"),
            Ok(TaxId::Cpf("52998224725".into()))
        );
        assert_eq!(
            TaxId::parse("11.222.333/0001-81"),
            Ok(TaxId::Cnpj("11222333000181".into()))
        );
    }

    #[test]
    fn parse_rejects_bad_check_digits() {
        assert_eq!(
            TaxId::parse("529.982.247-26"),
            Err(TaxIdError::CheckDigitMismatch)
        );
        assert_eq!(
            TaxId::parse("11.222.333/0001-82"),
            Err(TaxIdError::CheckDigitMismatch)
        );
    }

    #[test]
    fn parse_rejects_repeated_digits_and_bad_length() {
        assert_eq!(TaxId::parse("111.111.111-11"), Err(TaxIdError::RepeatedDigits));
        assert_eq!(TaxId::parse("1234"), Err(TaxIdError::InvalidLength(4)));
    }

    #[test]
    fn display_uses_mask() {
        let id = TaxId::parse("52998224725").unwrap();
        assert_eq!(id.to_string(), "529.982.247-25");
    }
}
