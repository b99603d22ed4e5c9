use crate::imports::*;

use chrono::Datelike;
use regex::Regex;

/*
    Value validators for contact and note fields. Each normalizes as well as checks, and lists are
    de-duplicated keeping first occurrence order.
*/

const MAX_AGE_YEARS: i32 = 200;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9]{7,15}$").expect("phone pattern must compile")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern must compile")
});

pub fn normalize_phone(raw: &str) -> Result<String> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    if !PHONE_PATTERN.is_match(&compact) {
        return Err(AssistantError::invalid_data(format!(
            "invalid phone number: '{}'",
            raw.trim()
        )));
    }
    Ok(compact)
}

pub fn normalize_email(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if !EMAIL_PATTERN.is_match(trimmed) {
        return Err(AssistantError::invalid_data(format!(
            "invalid email address: '{trimmed}'"
        )));
    }
    // Local parts are case-sensitive in principle, domains never are.
    let (local, domain) = trimmed.rsplit_once('@').unwrap_or((trimmed, ""));
    Ok(format!("{local}@{}", domain.to_lowercase()))
}

fn normalize_list(items: &[String], normalize: fn(&str) -> Result<String>) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();
    for item in items.iter().filter(|item| !item.trim().is_empty()) {
        let value = normalize(item)?;
        if seen.insert(value.clone()) {
            normalized.push(value);
        }
    }
    Ok(normalized)
}

pub fn normalize_phones(items: &[String]) -> Result<Vec<String>> {
    normalize_list(items, normalize_phone)
}

pub fn normalize_emails(items: &[String]) -> Result<Vec<String>> {
    normalize_list(items, normalize_email)
}

/// Tags compare case-insensitively, so they are stored lower-case.
pub fn normalize_tags(items: &[String]) -> Result<Vec<String>> {
    normalize_list(items, |raw| {
        let tag = raw.trim().to_lowercase();
        if tag.chars().any(char::is_whitespace) {
            return Err(AssistantError::invalid_data(format!(
                "tag '{tag}' contains whitespace"
            )));
        }
        Ok(tag)
    })
}

pub fn check_birthday(birthday: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
    if birthday > today {
        return Err(AssistantError::invalid_data(format!(
            "birthday {} is in the future",
            birthday.format(crate::spec::DATE_FORMAT)
        )));
    }
    if today.year() - birthday.year() > MAX_AGE_YEARS {
        return Err(AssistantError::invalid_data(format!(
            "birthday {} is more than {MAX_AGE_YEARS} years ago",
            birthday.format(crate::spec::DATE_FORMAT)
        )));
    }
    Ok(birthday)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// Parameter validators, wired into command schemas.

pub fn validate_phones(value: ParamValue) -> Result<ParamValue> {
    match value {
        ParamValue::List(items) => normalize_phones(&items).map(ParamValue::List),
        other => Ok(other),
    }
}

pub fn validate_emails(value: ParamValue) -> Result<ParamValue> {
    match value {
        ParamValue::List(items) => normalize_emails(&items).map(ParamValue::List),
        other => Ok(other),
    }
}

pub fn validate_tags(value: ParamValue) -> Result<ParamValue> {
    match value {
        ParamValue::List(items) => normalize_tags(&items).map(ParamValue::List),
        other => Ok(other),
    }
}

pub fn validate_birthday(value: ParamValue) -> Result<ParamValue> {
    match value {
        ParamValue::Date(date) => check_birthday(date, today()).map(ParamValue::Date),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_phones_are_normalized_and_deduplicated() {
        let phones = normalize_phones(&strings(&[
            "+38 (067) 123-45-67",
            "0501112233",
            "+380671234567",
        ]))
        .unwrap();
        assert_eq!(phones, vec!["+380671234567", "0501112233"]);
    }

    #[test]
    fn test_bad_phone_is_invalid_data() {
        let err = normalize_phones(&strings(&["12ab"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid phone number: '12ab'");
        assert_eq!(AssistantError::find(&err).unwrap().title(), "Invalid Data");
    }

    #[test]
    fn test_emails_lowercase_domain() {
        let emails = normalize_emails(&strings(&["Anna@Example.COM", " anna@example.com "])).unwrap();
        assert_eq!(emails, vec!["Anna@example.com", "anna@example.com"]);
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("a@b").is_err());
    }

    #[test]
    fn test_tags_fold_case() {
        let tags = normalize_tags(&strings(&["Work", " work", "ideas", ""])).unwrap();
        assert_eq!(tags, vec!["work", "ideas"]);
        assert!(normalize_tags(&strings(&["two words"])).is_err());
    }

    #[test]
    fn test_birthday_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(check_birthday(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(), today).is_ok());
        assert!(check_birthday(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), today).is_err());
        assert!(check_birthday(NaiveDate::from_ymd_opt(1800, 1, 1).unwrap(), today).is_err());
    }
}
