//! Field configuration: defaults, per-instance overrides, fail-fast bound
//! parsing.

use crate::ParseError;
use crate::consts::{DEFAULT_DATE_FORMAT, DEFAULT_FIELD_LABEL, DEFAULT_MESSAGE_FORMAT};
use crate::format::{self, ShortYearCutoff};
use crate::types::Date;
use serde::Deserialize;
use std::str::FromStr;

/// Error type for field configuration.
///
/// Raised at construction time: a field with an unusable bound configuration
/// is refused outright rather than treating every date as out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The minDate option does not parse under the instance's own format.
    #[error("Unparseable minDate {value:?}: {source}")]
    InvalidMinBound { value: String, source: ParseError },

    /// The maxDate option does not parse under the instance's own format.
    #[error("Unparseable maxDate {value:?}: {source}")]
    InvalidMaxBound { value: String, source: ParseError },

    /// The shortYearCutoff option is neither an offset nor a pivot year.
    #[error("Unparseable shortYearCutoff {value:?}: {source}")]
    InvalidCutoff { value: String, source: ParseError },

    /// Bounds in the wrong order.
    #[error("Invalid bounds: minDate ({min}) is after maxDate ({max})")]
    InvertedBounds { min: Date, max: Date },
}

/// Options recognized at field-initialization time. Every key is optional;
/// unset keys take the crate defaults. Key names follow the wire form used
/// by the surrounding UI layer, so a JSON options object deserializes
/// directly; unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldOptions {
    pub date_format: Option<String>,
    pub message_format: Option<String>,
    pub is_required: Option<bool>,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub short_year_cutoff: Option<String>,
    pub has_time: Option<bool>,
    pub has_seconds: Option<bool>,
    pub field_label: Option<String>,
}

/// Resolved, immutable configuration for one field instance.
///
/// Built by merging [`FieldOptions`] over the defaults. The min/max bound
/// strings are parsed here, once, with the same format and cutoff applied to
/// user input. Omitted bounds are unbounded.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    date_format: String,
    message_format: String,
    field_label: String,
    is_required: bool,
    min_date: Option<Date>,
    max_date: Option<Date>,
    short_year_cutoff: ShortYearCutoff,
    has_time: bool,
    has_seconds: bool,
}

impl FieldConfig {
    /// Merges the options over the defaults and parses the bounds.
    ///
    /// # Errors
    /// Returns `ConfigError` for an unparseable bound or cutoff, or for
    /// `minDate > maxDate`.
    pub fn new(options: FieldOptions) -> Result<Self, ConfigError> {
        let date_format = options
            .date_format
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_owned());
        let message_format = options
            .message_format
            .unwrap_or_else(|| DEFAULT_MESSAGE_FORMAT.to_owned());
        let field_label = options
            .field_label
            .unwrap_or_else(|| DEFAULT_FIELD_LABEL.to_owned());

        let short_year_cutoff = match options.short_year_cutoff {
            Some(raw) => {
                ShortYearCutoff::from_str(&raw).map_err(|source| ConfigError::InvalidCutoff {
                    value: raw.clone(),
                    source,
                })?
            }
            None => ShortYearCutoff::default(),
        };

        let min_date = match options.min_date {
            Some(raw) => Some(
                format::parse(&raw, &date_format, short_year_cutoff).map_err(|source| {
                    ConfigError::InvalidMinBound {
                        value: raw.clone(),
                        source,
                    }
                })?,
            ),
            None => None,
        };
        let max_date = match options.max_date {
            Some(raw) => Some(
                format::parse(&raw, &date_format, short_year_cutoff).map_err(|source| {
                    ConfigError::InvalidMaxBound {
                        value: raw.clone(),
                        source,
                    }
                })?,
            ),
            None => None,
        };

        if let (Some(min), Some(max)) = (min_date, max_date) {
            if min > max {
                return Err(ConfigError::InvertedBounds { min, max });
            }
        }

        Ok(Self {
            date_format,
            message_format,
            field_label,
            is_required: options.is_required.unwrap_or(false),
            min_date,
            max_date,
            short_year_cutoff,
            has_time: options.has_time.unwrap_or(false),
            has_seconds: options.has_seconds.unwrap_or(false),
        })
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn message_format(&self) -> &str {
        &self.message_format
    }

    pub fn field_label(&self) -> &str {
        &self.field_label
    }

    pub const fn is_required(&self) -> bool {
        self.is_required
    }

    pub const fn min_date(&self) -> Option<Date> {
        self.min_date
    }

    pub const fn max_date(&self) -> Option<Date> {
        self.max_date
    }

    pub const fn short_year_cutoff(&self) -> ShortYearCutoff {
        self.short_year_cutoff
    }

    pub const fn has_time(&self) -> bool {
        self.has_time
    }

    pub const fn has_seconds(&self) -> bool {
        self.has_seconds
    }
}

impl Default for FieldConfig {
    /// The defaults alone: month-first format, optional, unbounded
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            message_format: DEFAULT_MESSAGE_FORMAT.to_owned(),
            field_label: DEFAULT_FIELD_LABEL.to_owned(),
            is_required: false,
            min_date: None,
            max_date: None,
            short_year_cutoff: ShortYearCutoff::default(),
            has_time: false,
            has_seconds: false,
        }
    }
}
