//! Employee code generation
//!
//! Codes look like `ONS-2025-0007`: three letters from the company name, the
//! year the code is issued and a per-company sequence.

const FALLBACK_PREFIX: &str = "CMP";

/// First three alphanumeric characters of the company name, upper-cased.
pub fn code_prefix(company_name: &str) -> String {
    let prefix: String = company_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if prefix.len() == 3 {
        prefix
    } else {
        FALLBACK_PREFIX.to_string()
    }
}

/// `PREFIX-YYYY-` part shared by every code of the year.
pub fn year_prefix(prefix: &str, year: i32) -> String {
    format!("{}-{}-", prefix, year)
}

pub fn format_code(prefix: &str, year: i32, sequence: u32) -> String {
    format!("{}{:04}", year_prefix(prefix, year), sequence)
}

/// Next sequence after the highest one among `existing` for this prefix/year.
///
/// Compared numerically, so `...-10000` sorts after `...-9999`. Codes with a
/// non-numeric suffix are ignored.
pub fn next_sequence<'a>(existing: impl IntoIterator<Item = &'a str>, prefix: &str, year: i32) -> u32 {
    let head = year_prefix(prefix, year);
    existing
        .into_iter()
        .filter_map(|code| code.strip_prefix(head.as_str()))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// Next code for the company given the codes already issued.
pub fn next_code<'a>(existing: impl IntoIterator<Item = &'a str>, company_name: &str, year: i32) -> String {
    let prefix = code_prefix(company_name);
    let sequence = next_sequence(existing, &prefix, year);
    format_code(&prefix, year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_from_company_name() {
        assert_eq!(code_prefix("ONS Solution"), "ONS");
        assert_eq!(code_prefix("a.b-c corp"), "ABC");
        assert_eq!(code_prefix("3M India"), "3MI");
    }

    #[test]
    fn test_prefix_fallback_for_short_names() {
        assert_eq!(code_prefix("X"), "CMP");
        assert_eq!(code_prefix("--"), "CMP");
        assert_eq!(code_prefix(""), "CMP");
    }

    #[test]
    fn test_codes_increase_within_year() {
        let mut issued: Vec<String> = Vec::new();

        let first = next_code(issued.iter().map(String::as_str), "ONS Solution", 2025);
        assert_eq!(first, "ONS-2025-0001");
        issued.push(first);

        let second = next_code(issued.iter().map(String::as_str), "ONS Solution", 2025);
        assert_eq!(second, "ONS-2025-0002");
    }

    #[test]
    fn test_sequence_restarts_each_year_and_ignores_other_prefixes() {
        let issued = ["ONS-2024-0041", "ABC-2025-0100"];
        assert_eq!(next_code(issued, "ONS Solution", 2025), "ONS-2025-0001");
    }

    #[test]
    fn test_sequence_uses_numeric_maximum() {
        let issued = ["ONS-2025-9999", "ONS-2025-10000", "ONS-2025-0002", "ONS-2025-draft"];
        assert_eq!(next_sequence(issued, "ONS", 2025), 10001);
        assert_eq!(format_code("ONS", 2025, 10001), "ONS-2025-10001");
    }
}
