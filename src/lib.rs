//! Date entry validation for form inputs.
//!
//! The core is [`validate`]: given free-typed text and a [`FieldConfig`], it
//! decides whether the text is a real calendar date under the configured
//! format, required-ness, and min/max range rules, and produces a
//! [`ValidationResult`] with a user-facing message. [`DateInput`] wraps the
//! validator for a live field, coordinating a popup picker, a feedback sink,
//! and an optional companion time-of-day sub-field through injected traits.

mod config;
mod consts;
mod field;
mod format;
mod prelude;
mod types;

pub use config::{ConfigError, FieldConfig, FieldOptions};
pub use consts::*;
pub use field::{DateInput, DateSource, FeedbackSink, PickerWidget, TimeField, TimeValue};
pub use format::{ShortYearCutoff, format_date, parse as parse_date};
pub use types::{Date, DateTime, Day, Month, Year, days_in_month, is_leap_year};

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Invalid time {hours}:{minutes:02}:{seconds:02}")]
    InvalidTime { hours: u8, minutes: u8, seconds: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// The date payload of a validation result.
///
/// An unparseable input yields `NotADate` rather than an error or a panic;
/// it is a distinct state from `Empty`, and callers must not format or
/// compare it. An out-of-range input still yields `Parsed`: the date is
/// real, it just falls outside the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DatePayload {
    /// Nothing to parse
    #[display(fmt = "empty")]
    Empty,
    /// Input that did not parse as a date under the configured format
    #[display(fmt = "not-a-date")]
    NotADate,
    /// A real calendar date (possibly outside the configured range)
    #[display(fmt = "{_0}")]
    Parsed(Date),
}

impl DatePayload {
    /// The parsed date, when there is one
    pub const fn as_date(&self) -> Option<Date> {
        match self {
            Self::Parsed(date) => Some(*date),
            Self::Empty | Self::NotADate => None,
        }
    }
}

/// Outcome of validating one committed input. Produced fresh per call;
/// immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    is_valid: bool,
    message: Option<String>,
    date: DatePayload,
    time_value: Option<TimeValue>,
}

impl ValidationResult {
    pub(crate) fn valid(message: String, date: DatePayload) -> Self {
        Self {
            is_valid: true,
            message: Some(message),
            date,
            time_value: None,
        }
    }

    pub(crate) fn invalid(message: String, date: DatePayload) -> Self {
        Self {
            is_valid: false,
            message: Some(message),
            date,
            time_value: None,
        }
    }

    /// The canonical cleared state: not valid, no message, no date
    pub(crate) const fn cleared() -> Self {
        Self {
            is_valid: false,
            message: None,
            date: DatePayload::Empty,
            time_value: None,
        }
    }

    pub(crate) fn with_time_value(mut self, time_value: TimeValue) -> Self {
        self.time_value = Some(time_value);
        self
    }

    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub const fn date(&self) -> DatePayload {
        self.date
    }

    /// The companion time-field reading, attached only by the field
    /// controller when a time sub-field is configured
    pub const fn time_value(&self) -> Option<TimeValue> {
        self.time_value
    }
}

/// Validates one committed input against the field configuration.
///
/// Pure and deterministic: no I/O, no side effects, and it never panics or
/// returns an error. Every failure is a [`ValidationResult`] value.
/// Precedence: required/empty first, then parseability, then the inclusive
/// min/max range check. Range failures keep the parsed date in the payload;
/// only unparseable input yields the `NotADate` sentinel.
pub fn validate(raw: Option<&str>, config: &FieldConfig) -> ValidationResult {
    let text = raw.unwrap_or("").trim();
    let label = config.field_label();

    if text.is_empty() {
        return if config.is_required() {
            ValidationResult::invalid(format!("{label} is required"), DatePayload::Empty)
        } else {
            ValidationResult::valid(format!("{label} is empty"), DatePayload::Empty)
        };
    }

    let date = match format::parse(text, config.date_format(), config.short_year_cutoff()) {
        Ok(date) => date,
        Err(_) => {
            return ValidationResult::invalid(format!("{label} is invalid"), DatePayload::NotADate);
        }
    };

    if let Some(min) = config.min_date() {
        if date < min {
            let bound = format::format_date(min, config.date_format());
            return ValidationResult::invalid(
                format!("{label} must not be earlier than {bound}"),
                DatePayload::Parsed(date),
            );
        }
    }
    if let Some(max) = config.max_date() {
        if date > max {
            let bound = format::format_date(max, config.date_format());
            return ValidationResult::invalid(
                format!("{label} must not be later than {bound}"),
                DatePayload::Parsed(date),
            );
        }
    }

    ValidationResult::valid(
        format::format_date(date, config.message_format()),
        DatePayload::Parsed(date),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(options: FieldOptions) -> FieldConfig {
        FieldConfig::new(options).unwrap()
    }

    fn bounded_required() -> FieldConfig {
        config(FieldOptions {
            min_date: Some("01/01/1900".to_owned()),
            max_date: Some("01/01/2050".to_owned()),
            is_required: Some(true),
            short_year_cutoff: Some("2045".to_owned()),
            ..FieldOptions::default()
        })
    }

    #[test]
    fn test_empty_optional_is_valid() {
        let cfg = config(FieldOptions::default());

        for raw in [None, Some(""), Some("   ")] {
            let result = validate(raw, &cfg);
            assert!(result.is_valid(), "empty input should be valid: {raw:?}");
            assert_eq!(result.date(), DatePayload::Empty);
            assert_eq!(result.message(), Some("Date is empty"));
        }
    }

    #[test]
    fn test_empty_required_is_invalid() {
        let cfg = bounded_required();

        for raw in [None, Some("")] {
            let result = validate(raw, &cfg);
            assert!(!result.is_valid());
            assert_eq!(result.date(), DatePayload::Empty);
            assert_eq!(result.message(), Some("Date is required"));
        }
    }

    #[test]
    fn test_required_message_uses_field_label() {
        let cfg = config(FieldOptions {
            is_required: Some(true),
            field_label: Some("Start date".to_owned()),
            ..FieldOptions::default()
        });

        let result = validate(Some(""), &cfg);
        assert_eq!(result.message(), Some("Start date is required"));
    }

    #[test]
    fn test_valid_date_confirmation_message() {
        let cfg = bounded_required();

        let result = validate(Some("06/15/2020"), &cfg);
        assert!(result.is_valid());
        assert_eq!(
            result.date(),
            DatePayload::Parsed(Date::new(2020, 6, 15).unwrap())
        );
        // Default message format is "D M dd, yy"; 2020-06-15 was a Monday
        assert_eq!(result.message(), Some("Mon Jun 15, 2020"));
    }

    #[test]
    fn test_garbage_input_is_not_a_date() {
        let cfg = bounded_required();

        struct TestCase {
            input: &'static str,
            description: &'static str,
        }

        let cases = [
            TestCase {
                input: "not-a-date",
                description: "non-numeric text",
            },
            TestCase {
                input: "13/45/2020",
                description: "impossible month and day",
            },
            TestCase {
                input: "02/30/2020",
                description: "impossible calendar date",
            },
            TestCase {
                input: "06/15/2020 extra",
                description: "trailing input",
            },
        ];

        for case in &cases {
            let result = validate(Some(case.input), &cfg);
            assert!(!result.is_valid(), "{} should fail", case.description);
            assert_eq!(
                result.date(),
                DatePayload::NotADate,
                "{} should yield the sentinel",
                case.description
            );
            assert_eq!(result.message(), Some("Date is invalid"));
        }
    }

    #[test]
    fn test_below_min_names_the_bound() {
        let cfg = bounded_required();

        let result = validate(Some("01/01/1899"), &cfg);
        assert!(!result.is_valid());
        assert_eq!(
            result.message(),
            Some("Date must not be earlier than 01/01/1900")
        );
        // Out-of-range is not the same failure class as unparseable: the
        // payload still carries the parsed date
        assert_eq!(
            result.date(),
            DatePayload::Parsed(Date::new(1899, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_above_max_names_the_bound() {
        let cfg = bounded_required();

        let result = validate(Some("01/02/2050"), &cfg);
        assert!(!result.is_valid());
        assert_eq!(
            result.message(),
            Some("Date must not be later than 01/01/2050")
        );
        assert_eq!(
            result.date(),
            DatePayload::Parsed(Date::new(2050, 1, 2).unwrap())
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let cfg = bounded_required();

        let at_min = validate(Some("01/01/1900"), &cfg);
        assert!(at_min.is_valid(), "min bound itself is in range");

        let at_max = validate(Some("01/01/2050"), &cfg);
        assert!(at_max.is_valid(), "max bound itself is in range");
    }

    #[test]
    fn test_min_only_bound() {
        let cfg = config(FieldOptions {
            min_date: Some("01/01/1900".to_owned()),
            ..FieldOptions::default()
        });

        let below = validate(Some("12/31/1899"), &cfg);
        assert_eq!(
            below.message(),
            Some("Date must not be earlier than 01/01/1900")
        );

        let far_future = validate(Some("01/01/9000"), &cfg);
        assert!(far_future.is_valid(), "no max bound configured");
    }

    #[test]
    fn test_max_only_bound() {
        let cfg = config(FieldOptions {
            max_date: Some("01/01/2050".to_owned()),
            ..FieldOptions::default()
        });

        let above = validate(Some("01/02/2050"), &cfg);
        assert_eq!(
            above.message(),
            Some("Date must not be later than 01/01/2050")
        );

        let distant_past = validate(Some("01/01/0100"), &cfg);
        assert!(distant_past.is_valid(), "no min bound configured");
    }

    #[test]
    fn test_range_message_uses_field_label() {
        let cfg = config(FieldOptions {
            min_date: Some("01/01/1900".to_owned()),
            field_label: Some("Due date".to_owned()),
            ..FieldOptions::default()
        });

        let result = validate(Some("01/01/1899"), &cfg);
        assert_eq!(
            result.message(),
            Some("Due date must not be earlier than 01/01/1900")
        );
    }

    #[test]
    fn test_two_digit_years_resolve_like_the_bounds() {
        // The input and the bounds go through the same format and cutoff;
        // a two-digit bound and a two-digit input must agree.
        let cfg = config(FieldOptions {
            min_date: Some("01/01/00".to_owned()),
            short_year_cutoff: Some("2045".to_owned()),
            ..FieldOptions::default()
        });

        let below = validate(Some("06/15/99"), &cfg);
        assert!(!below.is_valid(), "99 resolves to 1999, before 2000");
        assert_eq!(
            below.message(),
            Some("Date must not be earlier than 01/01/2000")
        );

        let above = validate(Some("06/15/20"), &cfg);
        assert!(above.is_valid(), "20 resolves to 2020, after 2000");
    }

    #[test]
    fn test_parsed_date_round_trips_through_the_format() {
        let cfg = bounded_required();

        for text in ["06/15/2020", "01/01/1900", "12/31/2049", "02/29/2020"] {
            let result = validate(Some(text), &cfg);
            let date = result.date().as_date().unwrap_or_else(|| {
                panic!("{text} should parse");
            });
            assert_eq!(format_date(date, "mm/dd/yy"), text);
        }
    }

    #[test]
    fn test_validator_never_panics_on_hostile_input() {
        let cfg = bounded_required();

        for text in ["\u{0}", "////", "99999999999999999999", "''", "-1/-1/-1"] {
            let result = validate(Some(text), &cfg);
            assert!(!result.is_valid(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_custom_format_and_message() {
        let cfg = config(FieldOptions {
            date_format: Some("yy-mm-dd".to_owned()),
            message_format: Some("DD, MM d, yy".to_owned()),
            min_date: Some("1900-01-01".to_owned()),
            ..FieldOptions::default()
        });

        let result = validate(Some("2020-06-15"), &cfg);
        assert!(result.is_valid());
        assert_eq!(result.message(), Some("Monday, June 15, 2020"));

        let below = validate(Some("1899-12-31"), &cfg);
        assert_eq!(
            below.message(),
            Some("Date must not be earlier than 1900-01-01")
        );
    }

    #[test]
    fn test_result_has_no_time_value() {
        // Only the field controller attaches a companion time reading
        let cfg = bounded_required();
        let result = validate(Some("06/15/2020"), &cfg);
        assert_eq!(result.time_value(), None);
    }
}
