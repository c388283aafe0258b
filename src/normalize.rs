use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove diacritics: canonical decomposition, then drop combining marks.
/// Base letters are never altered, so this is locale-independent.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start_of_word = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    out
}

/// Person name: trim, Title Case, strip diacritics.
pub fn normalize_name(value: &str) -> String {
    strip_accents(&title_case(value.trim()))
}

/// Surname: trim, upper-case, strip diacritics.
pub fn normalize_surname(value: &str) -> String {
    strip_accents(&value.trim().to_uppercase())
}

/// National ID: trim, drop internal spaces and hyphens, upper-case.
pub fn normalize_dni(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Keep only ASCII digits. Used for phones, card numbers and CVVs.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn normalize_expiry(value: &str) -> String {
    value.trim().to_string()
}

/// Canonical column key: trim, lower-case, strip diacritics, spaces to
/// underscores. Every later stage addresses columns by these keys.
pub fn normalize_column_name(name: &str) -> String {
    strip_accents(&name.trim().to_lowercase()).replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_accents() {
        assert_eq!(strip_accents("José Ñuñez"), "Jose Nunez");
        assert_eq!(strip_accents("àéîõü"), "aeiou");
        assert_eq!(strip_accents("plain"), "plain");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  maría JOSÉ  "), "Maria Jose");
        assert_eq!(normalize_name("jean-luc"), "Jean-Luc");
    }

    #[test]
    fn test_normalize_surname() {
        assert_eq!(normalize_surname(" garcía "), "GARCIA");
        assert_eq!(normalize_surname("de la Peña"), "DE LA PENA");
    }

    #[test]
    fn test_normalize_dni() {
        assert_eq!(normalize_dni(" 12345678-z "), "12345678Z");
        assert_eq!(normalize_dni("12 345 678 z"), "12345678Z");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana.Lopez@Example.COM "), "ana.lopez@example.com");
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("600 12 34 56"), "600123456");
        assert_eq!(digits_only("4539-1488-0343-6467"), "4539148803436467");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name(" Código Cliente "), "codigo_cliente");
        assert_eq!(normalize_column_name("DNI"), "dni");
        assert_eq!(normalize_column_name("Número Tarjeta"), "numero_tarjeta");
    }
}
