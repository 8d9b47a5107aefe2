use chrono::{NaiveDate, NaiveTime};

/// Validate a username: 2-50 chars, alphanumeric, underscore, dot or dash.
pub fn validate_username(username: &str) -> Option<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Some("Username is required".to_string());
    }
    if trimmed.len() < 2 {
        return Some("Username must be at least 2 characters".to_string());
    }
    if trimmed.len() > 50 {
        return Some("Username must be at most 50 characters".to_string());
    }
    if !trimmed.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '-') {
        return Some("Username may only contain letters, numbers, '.', '-' and '_'".to_string());
    }
    None
}

/// Validate a password: min 6 chars.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if password.len() < 6 {
        return Some("Password must be at least 6 characters".to_string());
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Value must be one of a fixed set (exact match after trimming).
pub fn validate_one_of(value: &str, field_name: &str, allowed: &[&str]) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if !allowed.contains(&trimmed) {
        return Some(format!("{field_name} must be one of: {}", allowed.join(", ")));
    }
    None
}

/// Hex color: `#rgb` or `#rrggbb`.
pub fn validate_hex_color(value: &str, field_name: &str) -> Option<String> {
    let trimmed = value.trim();
    let digits = match trimmed.strip_prefix('#') {
        Some(d) => d,
        None => return Some(format!("{field_name} must be a hex color like #1e90ff")),
    };
    if (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        None
    } else {
        Some(format!("{field_name} must be a hex color like #1e90ff"))
    }
}

/// Whole number greater than zero.
pub fn parse_positive_int(value: &str, field_name: &str) -> Result<i64, String> {
    match value.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(format!("{field_name} must be greater than 0")),
        Err(_) if value.trim().is_empty() => Err(format!("{field_name} is required")),
        Err(_) => Err(format!("{field_name} must be a whole number")),
    }
}

/// Whole number, zero allowed.
pub fn parse_non_negative_int(value: &str, field_name: &str) -> Result<i64, String> {
    match value.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        Ok(_) => Err(format!("{field_name} cannot be negative")),
        Err(_) if value.trim().is_empty() => Err(format!("{field_name} is required")),
        Err(_) => Err(format!("{field_name} must be a whole number")),
    }
}

/// Number inside `[min, max]`.
pub fn parse_number_in_range(value: &str, field_name: &str, min: f64, max: f64) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= min && n <= max => Ok(n),
        Ok(_) => Err(format!("{field_name} must be between {min} and {max}")),
        Err(_) if value.trim().is_empty() => Err(format!("{field_name} is required")),
        Err(_) => Err(format!("{field_name} must be a number")),
    }
}

/// Optional positive whole number: blank gives `None`.
pub fn parse_optional_positive_int(value: &str, field_name: &str) -> Result<Option<i64>, String> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_positive_int(value, field_name).map(Some)
}

/// Optional `YYYY-MM-DD` date.
pub fn parse_optional_date(value: &str, field_name: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("{field_name} must be a date (YYYY-MM-DD)"))
}

/// Optional `HH:MM` time.
pub fn parse_optional_time(value: &str, field_name: &str) -> Result<Option<NaiveTime>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map(Some)
        .map_err(|_| format!("{field_name} must be a time (HH:MM)"))
}

/// When both ends are present the end must come after the start.
pub fn validate_time_range(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<String> {
    match (start, end) {
        (Some(s), Some(e)) if e <= s => Some("End time must be after start time".to_string()),
        _ => None,
    }
}

/// Ids from path segments are passed straight into backend URLs.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_and_optional_text() {
        assert!(validate_required("  ", "Name", 10).is_some());
        assert!(validate_required("Kalam", "Name", 10).is_none());
        assert!(validate_required("abcdefghijk", "Name", 10).is_some());
        assert!(validate_optional("", "Notes", 5).is_none());
        assert!(validate_optional("toolong", "Notes", 5).is_some());
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("a").is_some());
        assert!(validate_username("team.red-1").is_none());
        assert!(validate_username("bad name").is_some());
    }

    #[test]
    fn positive_and_non_negative_numbers() {
        assert_eq!(parse_positive_int("3", "Max"), Ok(3));
        assert_eq!(parse_positive_int("0", "Max"), Err("Max must be greater than 0".to_string()));
        assert_eq!(parse_positive_int("", "Max"), Err("Max is required".to_string()));
        assert_eq!(parse_positive_int("x", "Max"), Err("Max must be a whole number".to_string()));
        assert_eq!(parse_non_negative_int("0", "Points"), Ok(0));
        assert!(parse_non_negative_int("-1", "Points").is_err());
        assert_eq!(parse_optional_positive_int(" ", "Duration"), Ok(None));
    }

    #[test]
    fn numbers_in_range() {
        assert_eq!(parse_number_in_range("40", "From", 0.0, 100.0), Ok(40.0));
        assert!(parse_number_in_range("101", "From", 0.0, 100.0).is_err());
        assert!(parse_number_in_range("NaN", "From", 0.0, 100.0).is_err());
    }

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#fff", "Color").is_none());
        assert!(validate_hex_color("#1E90FF", "Color").is_none());
        assert!(validate_hex_color("1e90ff", "Color").is_some());
        assert!(validate_hex_color("#12345", "Color").is_some());
        assert!(validate_hex_color("#ggg", "Color").is_some());
    }

    #[test]
    fn enumerations() {
        assert!(validate_one_of("Ula", "Category", &["Ula", "Aliya"]).is_none());
        assert!(validate_one_of("ula", "Category", &["Ula", "Aliya"]).is_some());
        assert!(validate_one_of("", "Category", &["Ula"]).is_some());
    }

    #[test]
    fn dates_and_time_ranges() {
        assert!(parse_optional_date("2025-02-30", "Date").is_err());
        assert!(parse_optional_date("2025-02-28", "Date").unwrap().is_some());
        let start = parse_optional_time("10:00", "Start").unwrap();
        let end = parse_optional_time("09:30", "End").unwrap();
        assert!(validate_time_range(start, end).is_some());
        assert!(validate_time_range(end, start).is_none());
        assert!(validate_time_range(start, None).is_none());
        assert!(parse_optional_time("25:00", "Start").is_err());
    }

    #[test]
    fn ids() {
        assert!(is_valid_id("65f0c2a1b3e4d5f6a7b8c9d0"));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id(""));
    }
}
