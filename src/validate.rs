use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::digits_only;

/// Check-letter table for Spanish DNI numbers, indexed by number mod 23.
const DNI_LETTERS: &[u8] = b"TRWAGMYFPDXBNJZSQVHLCKE";

fn regex(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern"))
}

fn dni_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^\d{8}[A-Z]$")
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
}

fn expiry_iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^\d{4}-\d{2}$")
}

fn expiry_slash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^\d{2}/\d{2,4}$")
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[A-Za-záéíóúÁÉÍÓÚñÑüÜ\s-]+$")
}

fn cod_cliente_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[A-Z]+\d+$")
}

/// Spanish DNI: 8 digits plus check letter (`LETTERS[number mod 23]`).
/// Case-insensitive on the letter.
pub fn validate_dni(dni: &str) -> bool {
    let dni = dni.trim().to_uppercase();
    if !dni_re().is_match(&dni) {
        return false;
    }
    let Ok(number) = dni[..8].parse::<u32>() else {
        return false;
    };
    let expected = DNI_LETTERS[(number % 23) as usize] as char;
    dni.as_bytes()[8] as char == expected
}

/// Spanish phone: exactly 9 digits after extraction, starting with 6-9.
pub fn validate_phone(phone: &str) -> bool {
    let digits = digits_only(phone);
    digits.len() == 9 && matches!(digits.as_bytes()[0], b'6'..=b'9')
}

pub fn validate_email(email: &str) -> bool {
    email_re().is_match(email.trim())
}

/// Luhn checksum over the extracted digits; 13-19 digits required.
/// Available as a primitive; the default card pipeline does not call it.
#[allow(dead_code)]
pub fn validate_card_number(number: &str) -> bool {
    let digits = digits_only(number);
    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }
    let parity = digits.len() % 2;
    let mut sum = 0u32;
    for (i, c) in digits.bytes().enumerate() {
        let mut d = u32::from(c - b'0');
        if i % 2 == parity {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

#[allow(dead_code)]
pub fn validate_cvv(cvv: &str) -> bool {
    let digits = digits_only(cvv);
    digits.len() == 3 || digits.len() == 4
}

/// Expiry: `YYYY-MM`, `MM/YY` or `MM/YYYY`; month must be 1-12. Does not
/// compare against the current date: a calendar-expired card still passes.
pub fn validate_expiry(expiry: &str) -> bool {
    let expiry = expiry.trim();
    if expiry_iso_re().is_match(expiry) {
        return expiry[5..7]
            .parse::<u32>()
            .map(|m| (1..=12).contains(&m))
            .unwrap_or(false);
    }
    if expiry_slash_re().is_match(expiry) {
        return expiry[..2]
            .parse::<u32>()
            .map(|m| (1..=12).contains(&m))
            .unwrap_or(false);
    }
    false
}

/// Letters (Spanish accents included), spaces and hyphens only.
#[allow(dead_code)]
pub fn validate_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name_re().is_match(name)
}

/// Client code: one or more letters followed by one or more digits.
#[allow(dead_code)]
pub fn validate_cod_cliente(cod: &str) -> bool {
    let cod = cod.trim().to_uppercase();
    cod_cliente_re().is_match(&cod)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dni_known_letter() {
        // 12345678 mod 23 = 9 -> 'Z'
        assert!(validate_dni("12345678Z"));
        assert!(!validate_dni("12345678A"));
    }

    #[test]
    fn test_validate_dni_case_insensitive_letter() {
        assert!(validate_dni("12345678z"));
        assert!(validate_dni(" 12345678Z "));
    }

    #[test]
    fn test_validate_dni_rejects_digit_changes() {
        assert!(!validate_dni("12345679Z"));
        assert!(!validate_dni("1234567Z"));
        assert!(!validate_dni("123456789Z"));
        assert!(!validate_dni(""));
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("600 12 34 56"));
        assert!(validate_phone("912345678"));
        assert!(!validate_phone("512345678")); // bad leading digit
        assert!(!validate_phone("60012345")); // 8 digits
        assert!(!validate_phone("6001234567")); // 10 digits
        assert!(!validate_phone(""));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana.lopez@example.com"));
        assert!(validate_email("a+b_c%d@sub.domain.co"));
        assert!(!validate_email("no-at-sign.com"));
        assert!(!validate_email("two@@example.com"));
        assert!(!validate_email("x@y.c")); // single-letter TLD
        assert!(!validate_email(""));
    }

    #[test]
    fn test_validate_card_number_luhn() {
        assert!(validate_card_number("4539 1488 0343 6467"));
        assert!(validate_card_number("4539148803436467"));
        assert!(!validate_card_number("4539148803436468"));
        assert!(!validate_card_number("123456789012")); // 12 digits
        assert!(!validate_card_number(""));
    }

    #[test]
    fn test_validate_cvv() {
        assert!(validate_cvv("123"));
        assert!(validate_cvv("1234"));
        assert!(validate_cvv("1 2 3"));
        assert!(!validate_cvv("12"));
        assert!(!validate_cvv("12345"));
    }

    #[test]
    fn test_validate_expiry() {
        assert!(validate_expiry("2026-05"));
        assert!(validate_expiry("05/26"));
        assert!(validate_expiry("05/2026"));
        assert!(!validate_expiry("2026-13")); // month 13
        assert!(!validate_expiry("00/26"));
        assert!(!validate_expiry("2026/05"));
        assert!(!validate_expiry("may 2026"));
        // calendar-expired but syntactically valid: accepted on purpose
        assert!(validate_expiry("2001-01"));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("María José"));
        assert!(validate_name("Jean-Luc"));
        assert!(!validate_name("R2D2"));
        assert!(!validate_name("   "));
    }

    #[test]
    fn test_validate_cod_cliente() {
        assert!(validate_cod_cliente("C001"));
        assert!(validate_cod_cliente("cli123"));
        assert!(!validate_cod_cliente("123C"));
        assert!(!validate_cod_cliente("CLI"));
    }
}
