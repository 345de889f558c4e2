use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::super::domain::{is_no, is_yes, matches_option, ApplicantRecord, BIRTH_DATE_FORMAT};
use super::rules::FieldValue;
use super::ValidationConfig;

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required";
pub(crate) const SELECT_AT_LEAST_ONE_MESSAGE: &str = "Select at least one option";
pub(crate) const NOT_IN_CATALOG_MESSAGE: &str = "Select a value from the list";

/// Shape check applied to a present value.
#[derive(Debug, Clone, Copy)]
pub enum Check {
    Present,
    /// At least three characters; letters, accents and spaces only.
    PersonName,
    /// Optional free text for places abroad: no digits or symbols.
    PlaceName { max_len: usize },
    Curp,
    /// `YYYY-MM-DD` and an applicant at least the configured minimum age.
    BirthDate,
    OneOf(&'static [&'static str]),
    YesNo,
    Digits { len: usize },
    DigitsUpTo { max_len: usize },
    Alphanumeric { len: usize },
    Email,
    Length { min: usize, max: usize },
    Gpa,
    AnySelected,
    /// Case-insensitive equality with another field of the record.
    Matches {
        other: fn(&ApplicantRecord) -> Option<&str>,
        message: &'static str,
    },
}

pub(crate) struct CheckContext<'a> {
    pub record: &'a ApplicantRecord,
    pub today: NaiveDate,
    pub config: &'a ValidationConfig,
    pub options: Option<&'a [String]>,
}

impl Check {
    pub(crate) fn missing_message(&self) -> &'static str {
        match self {
            Check::AnySelected => SELECT_AT_LEAST_ONE_MESSAGE,
            _ => REQUIRED_MESSAGE,
        }
    }

    /// Runs the shape check and, when a non-empty option set is registered,
    /// catalog membership. Callers handle absence separately.
    pub(crate) fn verify(&self, value: FieldValue<'_>, ctx: &CheckContext<'_>) -> Result<(), String> {
        match value {
            FieldValue::Text(Some(text)) => {
                self.verify_text(text, ctx)?;
                verify_membership(std::iter::once(text), ctx.options)
            }
            FieldValue::List(values) => {
                verify_membership(values.iter().map(String::as_str), ctx.options)
            }
            FieldValue::Text(None) => Err(self.missing_message().to_string()),
        }
    }

    fn verify_text(&self, text: &str, ctx: &CheckContext<'_>) -> Result<(), String> {
        let length = text.chars().count();
        match *self {
            Check::Present | Check::AnySelected => Ok(()),
            Check::PersonName => {
                if length < 3 {
                    Err("Minimum 3 characters".to_string())
                } else if !person_name_pattern().is_match(text) {
                    Err("Only letters, accents and spaces".to_string())
                } else {
                    Ok(())
                }
            }
            Check::PlaceName { max_len } => {
                if length > max_len || place_symbol_pattern().is_match(text) {
                    Err(format!("Maximum {max_len} characters, letters only"))
                } else {
                    Ok(())
                }
            }
            Check::Curp => {
                let upper = text.to_uppercase();
                if upper.chars().count() != 18 {
                    Err("Must be exactly 18 characters".to_string())
                } else if !curp_pattern().is_match(&upper) {
                    Err("Invalid CURP format".to_string())
                } else {
                    Ok(())
                }
            }
            Check::BirthDate => verify_birth_date(text, ctx),
            Check::OneOf(options) => {
                if options
                    .iter()
                    .any(|option| matches_option(Some(text), option))
                {
                    Ok(())
                } else {
                    Err(format!("Select one of: {}", options.join(", ")))
                }
            }
            Check::YesNo => {
                if is_yes(Some(text)) || is_no(Some(text)) {
                    Ok(())
                } else {
                    Err("Answer yes or no".to_string())
                }
            }
            Check::Digits { len } => {
                if length == len && text.chars().all(|c| c.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err(format!("Must be exactly {len} digits"))
                }
            }
            Check::DigitsUpTo { max_len } => {
                if (1..=max_len).contains(&length) && text.chars().all(|c| c.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err(format!("Up to {max_len} digits, numbers only"))
                }
            }
            Check::Alphanumeric { len } => {
                if length == len && text.chars().all(|c| c.is_ascii_alphanumeric()) {
                    Ok(())
                } else {
                    Err(format!("Must be exactly {len} alphanumeric characters"))
                }
            }
            Check::Email => {
                if email_pattern().is_match(text) {
                    Ok(())
                } else {
                    Err("Invalid email format".to_string())
                }
            }
            Check::Length { min, max } => {
                if (min..=max).contains(&length) {
                    Ok(())
                } else if min <= 1 {
                    Err(format!("Maximum {max} characters"))
                } else {
                    Err(format!("Between {min} and {max} characters"))
                }
            }
            Check::Gpa => {
                let config = ctx.config;
                match text.trim().parse::<f64>() {
                    Ok(gpa) if gpa.is_finite() && gpa >= config.gpa_min && gpa <= config.gpa_max => {
                        Ok(())
                    }
                    _ => Err(format!(
                        "GPA must be between {:.1} and {:.1}",
                        config.gpa_min, config.gpa_max
                    )),
                }
            }
            Check::Matches { other, message } => {
                let matches = other(ctx.record)
                    .map(|expected| expected.trim().eq_ignore_ascii_case(text.trim()))
                    .unwrap_or(false);
                if matches {
                    Ok(())
                } else {
                    Err(message.to_string())
                }
            }
        }
    }
}

fn verify_birth_date(text: &str, ctx: &CheckContext<'_>) -> Result<(), String> {
    let birth = NaiveDate::parse_from_str(text.trim(), BIRTH_DATE_FORMAT)
        .map_err(|_| "Enter a valid date (YYYY-MM-DD)".to_string())?;
    let minimum_age = ctx.config.minimum_age;
    match ctx.today.years_since(birth) {
        Some(age) if age >= minimum_age => Ok(()),
        Some(_) => Err(format!(
            "Applicant must be at least {minimum_age} years old"
        )),
        None => Err("Birth date cannot be in the future".to_string()),
    }
}

fn verify_membership<'a>(
    mut values: impl Iterator<Item = &'a str>,
    options: Option<&[String]>,
) -> Result<(), String> {
    let Some(options) = options.filter(|options| !options.is_empty()) else {
        return Ok(());
    };

    if values.all(|value| options.iter().any(|option| matches_option(Some(value), option))) {
        Ok(())
    } else {
        Err(NOT_IN_CATALOG_MESSAGE.to_string())
    }
}

fn person_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚüÜñÑ\s]+$").expect("person name pattern compiles")
    })
}

fn place_symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"[0-9!@#$%^&*(),.?":{}|<>]"#).expect("place symbol pattern compiles")
    })
}

fn curp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z]{4}[0-9]{6}[HM][A-Z]{5}[0-9A-Z][0-9]$").expect("CURP pattern compiles")
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid date")
    }

    fn verify(check: Check, text: &str) -> Result<(), String> {
        let record = ApplicantRecord::default();
        let config = ValidationConfig::default();
        let ctx = CheckContext {
            record: &record,
            today: today(),
            config: &config,
            options: None,
        };
        check.verify(FieldValue::Text(Some(text)), &ctx)
    }

    #[test]
    fn curp_requires_length_then_pattern() {
        assert_eq!(
            verify(Check::Curp, "GOMJ040512"),
            Err("Must be exactly 18 characters".to_string())
        );
        assert_eq!(
            verify(Check::Curp, "GOMJ040512XMSRRN09"),
            Err("Invalid CURP format".to_string())
        );
        assert!(verify(Check::Curp, "GOMJ040512HMSRRN09").is_ok());
        assert!(verify(Check::Curp, "gomj040512hmsrrn09").is_ok());
    }

    #[test]
    fn person_names_accept_accents_and_reject_digits() {
        assert!(verify(Check::PersonName, "José Ángel").is_ok());
        assert_eq!(
            verify(Check::PersonName, "Al"),
            Err("Minimum 3 characters".to_string())
        );
        assert_eq!(
            verify(Check::PersonName, "R2D2"),
            Err("Only letters, accents and spaces".to_string())
        );
    }

    #[test]
    fn birth_date_enforces_minimum_age() {
        assert!(verify(Check::BirthDate, "2008-07-31").is_ok());
        assert_eq!(
            verify(Check::BirthDate, "2010-08-02"),
            Err("Applicant must be at least 15 years old".to_string())
        );
        assert_eq!(
            verify(Check::BirthDate, "31/07/2008"),
            Err("Enter a valid date (YYYY-MM-DD)".to_string())
        );
        assert_eq!(
            verify(Check::BirthDate, "2030-01-01"),
            Err("Birth date cannot be in the future".to_string())
        );
    }

    #[test]
    fn email_needs_domain_with_dot() {
        assert!(verify(Check::Email, "aspirante@utez.edu.mx").is_ok());
        assert!(verify(Check::Email, "aspirante@utez").is_err());
        assert!(verify(Check::Email, "aspirante utez@edu.mx").is_err());
    }

    #[test]
    fn place_names_reject_symbols_and_long_values() {
        let check = Check::PlaceName { max_len: 50 };
        assert!(verify(check, "Guatemala").is_ok());
        assert!(verify(check, "Zona 10, #4").is_err());
        assert!(verify(check, &"a".repeat(51)).is_err());
    }

    #[test]
    fn membership_only_applies_to_registered_non_empty_sets() {
        let record = ApplicantRecord::default();
        let config = ValidationConfig::default();
        let options = vec!["Soltero(a)".to_string(), "Casado(a)".to_string()];
        let empty: Vec<String> = Vec::new();

        let mut ctx = CheckContext {
            record: &record,
            today: today(),
            config: &config,
            options: Some(&options),
        };
        assert!(Check::Present
            .verify(FieldValue::Text(Some("casado(a)")), &ctx)
            .is_ok());
        assert_eq!(
            Check::Present.verify(FieldValue::Text(Some("Viudo(a)")), &ctx),
            Err(NOT_IN_CATALOG_MESSAGE.to_string())
        );

        ctx.options = Some(&empty);
        assert!(Check::Present
            .verify(FieldValue::Text(Some("Viudo(a)")), &ctx)
            .is_ok());
    }
}
