//! Field controller: adapts the pure validator to one live input field.
//!
//! The controller owns the last validation result and the configuration, and
//! talks to the surrounding UI through three injected collaborators: the
//! popup picker, the feedback presentation, and an optional companion
//! time-of-day sub-field. Collaborators are resolved once at construction;
//! the controller never looks anything up by convention afterwards.

use crate::config::FieldConfig;
use crate::prelude::*;
use crate::types::{Date, DateTime};
use crate::{DatePayload, ValidationResult, format, validate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reading taken from a companion time-of-day sub-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeValue {
    pub is_valid: bool,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: Option<u8>,
}

/// The popup calendar collaborator. The widget is created elsewhere with its
/// own bounds/format configuration; the controller only moves its displayed
/// date around.
pub trait PickerWidget {
    fn set_displayed_date(&mut self, date: Option<Date>);
    fn displayed_date(&self) -> Option<Date>;
    /// Applies a relative adjustment token, e.g. `"c+5d"` for five days
    /// forward of the current selection.
    fn set_relative_date(&mut self, adjustment: &str);
}

/// Presentation of a validation result: tooltip-equivalent text plus an
/// error-indicator state that persists until the next successful validation.
pub trait FeedbackSink {
    fn apply_feedback(&mut self, result: &ValidationResult);
    fn clear_feedback(&mut self);
}

/// The companion time-of-day sub-field.
pub trait TimeField {
    fn time_value(&self) -> TimeValue;
    fn set_time(&mut self, text: &str);
    fn clear_time(&mut self);
    fn set_enabled(&mut self, enabled: bool);
}

/// Input accepted by [`DateInput::set_date`]: pre-formatted text, a date
/// value, or a date-time whose time of day feeds the companion field.
#[derive(Debug, Clone, PartialEq, From)]
pub enum DateSource {
    Text(String),
    Value(Date),
    ValueWithTime(DateTime),
}

impl From<&str> for DateSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Controller for one date-entry field.
pub struct DateInput {
    config: FieldConfig,
    value: ValidationResult,
    enabled: bool,
    picker: Option<Box<dyn PickerWidget>>,
    feedback: Option<Box<dyn FeedbackSink>>,
    time_field: Option<Box<dyn TimeField>>,
}

impl DateInput {
    /// Creates a controller with no collaborators attached.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            value: ValidationResult::cleared(),
            enabled: true,
            picker: None,
            feedback: None,
            time_field: None,
        }
    }

    pub fn with_picker(mut self, picker: Box<dyn PickerWidget>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn with_feedback(mut self, feedback: Box<dyn FeedbackSink>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn with_time_field(mut self, time_field: Box<dyn TimeField>) -> Self {
        self.time_field = Some(time_field);
        self
    }

    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Renders a date through the configured date format. The surrounding UI
    /// uses this to write the canonical text back into the element after a
    /// successful commit.
    pub fn format_date(&self, date: Date) -> String {
        format::format_date(date, self.config.date_format())
    }

    /// The commit entry: invoked by the external trigger (blur, picker
    /// close, or a programmatic call). Validates the text, stores the
    /// result, presents it through the feedback sink, and returns it.
    pub fn set_date_internal(&mut self, text: &str) -> ValidationResult {
        let result = validate(Some(text), &self.config);
        debug!(valid = result.is_valid(), payload = %result.date(), "commit");
        self.value = result.clone();
        self.show_feedback();
        result
    }

    /// Sets the field value. Non-text input is formatted through the
    /// configured date format first. Non-empty text updates the picker's
    /// displayed date (when it parses) and commits; empty text is a no-op
    /// and the stored result is returned unchanged. A date-time input also
    /// pushes its time of day down into the companion time field.
    pub fn set_date(&mut self, input: impl Into<DateSource>) -> ValidationResult {
        let (text, push_time) = match input.into() {
            DateSource::Text(text) => (text, None),
            DateSource::Value(date) => (self.format_date(date), None),
            DateSource::ValueWithTime(date_time) => {
                (self.format_date(date_time.date()), Some(date_time))
            }
        };

        if text.trim().is_empty() {
            return self.value.clone();
        }

        let parsed = format::parse(
            &text,
            self.config.date_format(),
            self.config.short_year_cutoff(),
        )
        .ok();
        if let (Some(picker), Some(date)) = (self.picker.as_mut(), parsed) {
            picker.set_displayed_date(Some(date));
        }

        let result = self.set_date_internal(&text);
        if let Some(date_time) = push_time {
            self.push_time(date_time);
        }
        result
    }

    // Hands a date-time input's time of day to the companion field, as
    // "H:MM" text, with seconds appended when configured.
    fn push_time(&mut self, date_time: DateTime) {
        if !self.config.has_time() {
            return;
        }
        let Some(time_field) = self.time_field.as_mut() else {
            return;
        };
        let mut text = format!("{}:{:02}", date_time.hours(), date_time.minutes());
        if self.config.has_seconds() {
            text.push_str(&format!(":{:02}", date_time.seconds()));
        }
        time_field.set_time(&text);
    }

    /// Resets to the canonical cleared state and clears the companion time
    /// field, the picker's displayed value, and any presented feedback.
    pub fn clear_date(&mut self) {
        debug!("clear");
        self.value = ValidationResult::cleared();
        if let Some(time_field) = self.time_field.as_mut() {
            time_field.clear_time();
        }
        if let Some(picker) = self.picker.as_mut() {
            picker.set_displayed_date(None);
        }
        if let Some(feedback) = self.feedback.as_mut() {
            feedback.clear_feedback();
        }
    }

    /// Re-validates the canonical formatted form of the stored date and,
    /// when a time sub-field is configured, attaches its current reading.
    /// The time merge is lazy: it happens here, on read, not on every
    /// commit. Cleared and unparseable states are returned as stored.
    pub fn date_value(&self) -> ValidationResult {
        let DatePayload::Parsed(stored) = self.value.date() else {
            return self.value.clone();
        };

        let text = self.format_date(stored);
        let mut result = validate(Some(&text), &self.config);
        if result.is_valid() && self.config.has_time() {
            if let Some(time_field) = self.time_field.as_ref() {
                result = result.with_time_value(time_field.time_value());
            }
        }
        result
    }

    /// The date component of [`date_value`](Self::date_value), with a valid
    /// companion time merged in (midnight otherwise). `None` when nothing
    /// usable is stored.
    pub fn date(&self) -> Option<DateTime> {
        let result = self.date_value();
        let date = result.date().as_date()?;
        let merged = result
            .time_value()
            .filter(|time| time.is_valid)
            .and_then(|time| {
                date.at(time.hours, time.minutes, time.seconds.unwrap_or(0))
                    .ok()
            });
        Some(merged.unwrap_or_else(|| date.at_midnight()))
    }

    /// The validity of [`date_value`](Self::date_value).
    pub fn is_valid(&self) -> bool {
        self.date_value().is_valid()
    }

    /// Shifts the displayed date by `days` through the picker's relative
    /// support, then commits the picker's new displayed date. A no-op when
    /// no picker is attached.
    pub fn add_days(&mut self, days: i32) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let adjustment = if days > 0 {
            format!("c+{days}d")
        } else {
            format!("c{days}d")
        };
        picker.set_relative_date(&adjustment);
        let text = picker
            .displayed_date()
            .map(|date| format::format_date(date, self.config.date_format()))
            .unwrap_or_default();
        debug!(days, "relative shift");
        self.set_date_internal(&text);
    }

    /// Enables or disables the field and its companion time field. While
    /// disabled, feedback is withheld: commits clear any presented error
    /// state instead of applying a new one.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if let Some(time_field) = self.time_field.as_mut() {
            time_field.set_enabled(enabled);
        }
        self.show_feedback();
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn show_feedback(&mut self) {
        let Some(feedback) = self.feedback.as_mut() else {
            return;
        };
        if self.enabled {
            feedback.apply_feedback(&self.value);
        } else {
            feedback.clear_feedback();
        }
    }
}
