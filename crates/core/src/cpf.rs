//! # CPF Module
//!
//! The Cadastro de Pessoa Física (CPF) is the Brazilian national document
//! which uniquely identifies a person: 9 base digits followed by two check
//! digits, each computed with a weighted sum mod 11.

use std::fmt;

/// A CPF document number, normalized at construction.
///
/// Formatting punctuation (`.` and `-`) is stripped; validation never fails
/// with an error, it only answers true/false.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf {
    code: String,
}

impl Cpf {
    /// Normalize a raw document number, stripping `.` and `-`.
    pub fn new(raw: &str) -> Self {
        Self {
            code: raw.replace('.', "").replace('-', ""),
        }
    }

    /// The normalized 11-digit code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the document passes both mod-11 checksum digits.
    pub fn is_valid(&self) -> bool {
        if self.code.len() != 11 || !self.code.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }

        let digits: Vec<u32> = self
            .code
            .bytes()
            .map(|b| u32::from(b - b'0'))
            .collect();

        let first = Self::check_digit(&digits[..9], 10);
        let second = Self::check_digit(&digits[..10], 11);

        digits[9] == first && digits[10] == second
    }

    // Weighted sum with weights counting down from `start_weight`, then
    // (sum * 10) % 11, folding 10 to 0.
    fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
        let sum: u32 = digits
            .iter()
            .enumerate()
            .map(|(index, digit)| digit * (start_weight - index as u32))
            .sum();

        match (sum * 10) % 11 {
            10 => 0,
            digit => digit,
        }
    }
}

impl fmt::Display for Cpf {
    /// Renders a valid CPF as `###.###.###-##`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "Invalid CPF number");
        }

        write!(
            f,
            "{}.{}.{}-{}",
            &self.code[0..3],
            &self.code[3..6],
            &self.code[6..9],
            &self.code[9..11]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CPFS: [&str; 4] = [
        "83065825007",
        "92236202016",
        "52998224725",
        "95418299026",
    ];

    #[test]
    fn test_valid_cpfs() {
        for code in VALID_CPFS {
            assert!(Cpf::new(code).is_valid(), "{code} should be valid");
        }
    }

    #[test]
    fn test_formatted_input_is_normalized() {
        let cpf = Cpf::new("830.658.250-07");
        assert_eq!(cpf.code(), "83065825007");
        assert!(cpf.is_valid());
    }

    #[test]
    fn test_single_digit_mutations_are_rejected() {
        // The checksum must discriminate every single-digit error in the
        // tested corpus.
        for code in VALID_CPFS {
            for position in 0..11 {
                let original = code.as_bytes()[position] - b'0';
                let mutated_digit = (original + 1) % 10;

                let mut mutated = code.as_bytes().to_vec();
                mutated[position] = b'0' + mutated_digit;
                let mutated = String::from_utf8(mutated).unwrap();

                assert!(
                    !Cpf::new(&mutated).is_valid(),
                    "mutation {mutated} of {code} should be invalid"
                );
            }
        }
    }

    #[test]
    fn test_wrong_length_is_invalid() {
        assert!(!Cpf::new("").is_valid());
        assert!(!Cpf::new("1234567890").is_valid());
        assert!(!Cpf::new("123456789012").is_valid());
    }

    #[test]
    fn test_non_digit_content_is_invalid() {
        assert!(!Cpf::new("8306582500a").is_valid());
        assert!(!Cpf::new("abcdefghijk").is_valid());
    }

    #[test]
    fn test_display_formats_valid_cpf() {
        assert_eq!(Cpf::new("83065825007").to_string(), "830.658.250-07");
        assert_eq!(Cpf::new("123").to_string(), "Invalid CPF number");
    }
}
