//! Format-pattern parsing and rendering.
//!
//! The pattern language is the one popup date pickers use: `d`/`dd` day,
//! `D`/`DD` weekday name, `m`/`mm` month number, `M`/`MM` month name,
//! `y` two-digit year, `yy` four-digit year, `'...'` quoted literal
//! (`''` inside a quoted run is a literal quote). Any other character
//! must match the input exactly.

use crate::ParseError;
use crate::consts::{
    DAY_ABBREVS, DAY_NAMES, DEFAULT_SHORT_YEAR_OFFSET, MONTH_ABBREVS, MONTH_NAMES, PATTERN_QUOTE,
};
use crate::types::{Date, civil_from_days};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 86_400;

/// Rule resolving two-digit years to a four-digit century.
///
/// A two-digit year lands in the pivot's century; results past the pivot
/// drop back one century. Any parsed year below 100 goes through this rule,
/// whatever the year token's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortYearCutoff {
    /// Fixed pivot year, e.g. `Pivot(2045)`: `30` resolves to 2030, `60` to 1960
    Pivot(u16),
    /// Pivot floats with the clock: current year plus the offset
    Offset(u8),
}

impl Default for ShortYearCutoff {
    fn default() -> Self {
        Self::Offset(DEFAULT_SHORT_YEAR_OFFSET)
    }
}

impl ShortYearCutoff {
    fn pivot_year(self) -> u16 {
        match self {
            Self::Pivot(year) => year,
            Self::Offset(offset) => current_year().saturating_add(u16::from(offset)),
        }
    }

    /// Resolves a two-digit year to a full year under this rule
    pub fn resolve(self, two_digit: u8) -> u16 {
        let pivot = self.pivot_year();
        let century = pivot - pivot % 100;
        let full = century + u16::from(two_digit);
        if full > pivot { full.saturating_sub(100) } else { full }
    }
}

impl FromStr for ShortYearCutoff {
    type Err = ParseError;

    /// `"+20"` is an offset from the current year; a bare four-digit number is
    /// a fixed pivot; a bare number below 100 pivots within the current century.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(rest) = trimmed.strip_prefix('+') {
            let offset = rest
                .parse::<u8>()
                .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
            return Ok(Self::Offset(offset));
        }
        let value = trimmed
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
        if value < 100 {
            let now = current_year();
            Ok(Self::Pivot(now - now % 100 + value))
        } else {
            Ok(Self::Pivot(value))
        }
    }
}

fn current_year() -> u16 {
    let days = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| (elapsed.as_secs() / SECONDS_PER_DAY) as i64)
        .unwrap_or(0);
    let (year, _, _) = civil_from_days(days);
    u16::try_from(year).unwrap_or(0)
}

/// Parses `text` against `pattern`, resolving two-digit years with `cutoff`.
///
/// # Errors
/// Every malformed input becomes a `ParseError`: literal mismatch, missing
/// number, unknown name, trailing input, or an impossible calendar date.
/// This function never panics.
pub fn parse(text: &str, pattern: &str, cutoff: ShortYearCutoff) -> Result<Date, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let input: Vec<char> = trimmed.chars().collect();
    let pat: Vec<char> = pattern.chars().collect();
    let mut pos = 0usize;
    let mut p = 0usize;

    let mut year: Option<u16> = None;
    let mut month: Option<u8> = None;
    let mut day: Option<u8> = None;

    while p < pat.len() {
        let token = pat[p];
        match token {
            'd' | 'm' | 'y' | 'D' | 'M' => {
                let doubled = p + 1 < pat.len() && pat[p + 1] == token;
                p += if doubled { 2 } else { 1 };
                match token {
                    'd' => day = Some(read_number(&input, &mut pos, 2)? as u8),
                    'm' => month = Some(read_number(&input, &mut pos, 2)? as u8),
                    'y' => {
                        let width = if doubled { 4 } else { 2 };
                        year = Some(read_number(&input, &mut pos, width)?);
                    }
                    'D' => {
                        // Weekday names are consumed but carry no date value
                        let table: &[&str] = if doubled { &DAY_NAMES } else { &DAY_ABBREVS };
                        read_name(&input, &mut pos, table)?;
                    }
                    'M' => {
                        let table: &[&str] = if doubled { &MONTH_NAMES } else { &MONTH_ABBREVS };
                        month = Some(read_name(&input, &mut pos, table)? as u8);
                    }
                    _ => {}
                }
            }
            PATTERN_QUOTE => {
                p += 1;
                while p < pat.len() {
                    if pat[p] == PATTERN_QUOTE {
                        if p + 1 < pat.len() && pat[p + 1] == PATTERN_QUOTE {
                            expect_literal(&input, &mut pos, PATTERN_QUOTE)?;
                            p += 2;
                        } else {
                            p += 1;
                            break;
                        }
                    } else {
                        expect_literal(&input, &mut pos, pat[p])?;
                        p += 1;
                    }
                }
            }
            literal => {
                expect_literal(&input, &mut pos, literal)?;
                p += 1;
            }
        }
    }

    if pos != input.len() {
        let rest: String = input[pos..].iter().collect();
        return Err(ParseError::InvalidFormat(format!(
            "Unexpected trailing input: {rest}"
        )));
    }

    let raw_year = year.ok_or_else(|| {
        ParseError::InvalidFormat(format!("Pattern has no year token: {pattern}"))
    })?;
    let full_year = if raw_year < 100 {
        cutoff.resolve(raw_year as u8)
    } else {
        raw_year
    };

    Date::new(full_year, month.unwrap_or(1), day.unwrap_or(1))
}

/// Renders `date` through `pattern`. Infallible: a `Date` is always a real
/// calendar date and unknown pattern characters pass through as literals.
pub fn format_date(date: Date, pattern: &str) -> String {
    let pat: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut p = 0usize;

    while p < pat.len() {
        let token = pat[p];
        match token {
            'd' | 'm' | 'y' | 'D' | 'M' => {
                let doubled = p + 1 < pat.len() && pat[p + 1] == token;
                p += if doubled { 2 } else { 1 };
                match token {
                    'd' if doubled => out.push_str(&format!("{:02}", date.day())),
                    'd' => out.push_str(&date.day().to_string()),
                    'm' if doubled => out.push_str(&format!("{:02}", date.month())),
                    'm' => out.push_str(&date.month().to_string()),
                    'y' if doubled => out.push_str(&format!("{:04}", date.year())),
                    'y' => out.push_str(&format!("{:02}", date.year() % 100)),
                    'D' if doubled => out.push_str(DAY_NAMES[date.weekday_index()]),
                    'D' => out.push_str(DAY_ABBREVS[date.weekday_index()]),
                    'M' if doubled => out.push_str(date.month_typed().name()),
                    'M' => out.push_str(date.month_typed().abbrev()),
                    _ => {}
                }
            }
            PATTERN_QUOTE => {
                p += 1;
                while p < pat.len() {
                    if pat[p] == PATTERN_QUOTE {
                        if p + 1 < pat.len() && pat[p + 1] == PATTERN_QUOTE {
                            out.push(PATTERN_QUOTE);
                            p += 2;
                        } else {
                            p += 1;
                            break;
                        }
                    } else {
                        out.push(pat[p]);
                        p += 1;
                    }
                }
            }
            literal => {
                out.push(literal);
                p += 1;
            }
        }
    }

    out
}

fn read_number(input: &[char], pos: &mut usize, max_digits: usize) -> Result<u16, ParseError> {
    let start = *pos;
    let mut value: u32 = 0;
    while *pos < input.len() && *pos - start < max_digits && input[*pos].is_ascii_digit() {
        value = value * 10 + u32::from(input[*pos]) - u32::from('0');
        *pos += 1;
    }
    if *pos == start {
        return Err(ParseError::InvalidFormat(format!(
            "Expected a number at position {start}"
        )));
    }
    Ok(value as u16)
}

// Longest case-insensitive match against a name table; the table index is the
// value (months are 1-indexed, index 0 is an empty placeholder).
fn read_name(input: &[char], pos: &mut usize, table: &[&str]) -> Result<usize, ParseError> {
    let mut best: Option<(usize, usize)> = None;
    for (index, name) in table.iter().enumerate() {
        if name.is_empty() {
            continue;
        }
        let len = name.chars().count();
        if *pos + len > input.len() {
            continue;
        }
        let candidate: String = input[*pos..*pos + len].iter().collect();
        if candidate.eq_ignore_ascii_case(name)
            && best.is_none_or(|(_, best_len)| len > best_len)
        {
            best = Some((index, len));
        }
    }
    match best {
        Some((index, len)) => {
            *pos += len;
            Ok(index)
        }
        None => {
            let rest: String = input[*pos..].iter().take(12).collect();
            Err(ParseError::InvalidFormat(format!("Unknown name: {rest}")))
        }
    }
}

fn expect_literal(input: &[char], pos: &mut usize, expected: char) -> Result<(), ParseError> {
    if *pos < input.len() && input[*pos] == expected {
        *pos += 1;
        Ok(())
    } else {
        Err(ParseError::InvalidFormat(format!(
            "Expected '{expected}' at position {pos}",
            pos = *pos
        )))
    }
}
