//! Small parsing and formatting helpers shared by the core and the CLI

/// Extract the first integer substring of a free-text field.
///
/// Backend `configuration` values look like `"3 BHK"`, `"2 & 3 BHK"` or
/// `"Studio"`; only the leading run of digits is meaningful.
#[must_use]
pub fn first_integer(s: &str) -> Option<u32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Coerce a numeric string that may carry currency symbols, commas or
/// stray whitespace into an `f64`. Returns `None` when no digits remain.
#[must_use]
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok().filter(|n: &f64| n.is_finite())
}

/// Format a rupee amount the way the listings UI abbreviates it:
/// lakhs below one crore, crores above.
#[must_use]
pub fn format_inr(amount: f64) -> String {
    if amount >= 10_000_000.0 {
        let crores = amount / 10_000_000.0;
        if (crores - crores.trunc()).abs() < f64::EPSILON {
            format!("₹{crores:.0}cr")
        } else {
            format!("₹{crores:.1}cr")
        }
    } else if amount >= 100_000.0 {
        format!("₹{:.0}L", amount / 100_000.0)
    } else {
        format!("₹{amount:.0}")
    }
}

/// Title-case every word of a label (`"swimming pool"` → `"Swimming Pool"`)
#[must_use]
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a string to a maximum length
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_integer_plain() {
        assert_eq!(first_integer("3 BHK"), Some(3));
        assert_eq!(first_integer("12 BHK duplex"), Some(12));
    }

    #[test]
    fn test_first_integer_takes_leading_run_only() {
        assert_eq!(first_integer("2 & 3 BHK"), Some(2));
        assert_eq!(first_integer("2-3 BHK"), Some(2));
    }

    #[test]
    fn test_first_integer_absent() {
        assert_eq!(first_integer("Studio"), None);
        assert_eq!(first_integer(""), None);
    }

    #[test]
    fn test_parse_numeric_string_plain() {
        assert_eq!(parse_numeric_string("4500000"), Some(4_500_000.0));
        assert_eq!(parse_numeric_string("1250.5"), Some(1250.5));
    }

    #[test]
    fn test_parse_numeric_string_currency_noise() {
        assert_eq!(parse_numeric_string("₹ 45,00,000"), Some(4_500_000.0));
        assert_eq!(parse_numeric_string(" 1,250 sq.ft "), Some(1250.0));
    }

    #[test]
    fn test_parse_numeric_string_no_digits() {
        assert_eq!(parse_numeric_string("price on request"), None);
        assert_eq!(parse_numeric_string(""), None);
    }

    #[test]
    fn test_parse_numeric_string_multiple_dots() {
        // "1.2.3" does not parse; the caller degrades to its default
        assert_eq!(parse_numeric_string("1.2.3"), None);
    }

    #[test]
    fn test_format_inr_lakhs() {
        assert_eq!(format_inr(5_000_000.0), "₹50L");
        assert_eq!(format_inr(7_500_000.0), "₹75L");
    }

    #[test]
    fn test_format_inr_crores() {
        assert_eq!(format_inr(10_000_000.0), "₹1cr");
        assert_eq!(format_inr(15_000_000.0), "₹1.5cr");
    }

    #[test]
    fn test_format_inr_small_amounts() {
        assert_eq!(format_inr(95_000.0), "₹95000");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("swimming pool"), "Swimming Pool");
        assert_eq!(title_case("GYM"), "GYM");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
    }
}
