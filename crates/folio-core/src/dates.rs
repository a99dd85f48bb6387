//! Fuzzy normalizer for loosely-formatted legacy date strings.
//!
//! Legacy records carry dates as contiguous digit runs (`20201231`), partial
//! dates (`2020-12`), textual months (`2018-Oct`), malformed month ranges
//! (`2018-Oct-Dec`) and plainly invalid segments (`2019-20-01`). The
//! normalizer tries a fixed priority list of (format template, corrective
//! transform) pairs and renders the first successful parse as an ISO-8601
//! timestamp at microsecond precision, suffixed `Z`.

use chrono::{
  NaiveDate,
  format::{Parsed, StrftimeItems, parse},
};

use crate::{Error, Result};

/// Candidate (template, correction) pairs, tried in priority order. The
/// correction is applied to the input before the parse attempt.
const CANDIDATES: &[(&str, Correction)] = &[
  // Exact forms, no correction.
  ("%Y-%m-%d", Correction::None),
  ("%Y-%m", Correction::None),
  ("%Y", Correction::None),
  // Month-name variants. chrono's `%B` accepts the abbreviated form as well
  // when parsing, so one pair per shape covers `Oct` and `October`.
  ("%Y-%B-%d", Correction::None),
  ("%Y-%B", Correction::None),
  // Malformed textual month range, e.g. `2018-Oct-Dec`.
  ("%Y-%B", Correction::LimitMonthRange),
  // Numeric forms with invalid parts stripped, e.g. `2019-20-01` -> `2019`.
  ("%Y-%m-%d", Correction::StripInvalidParts),
  ("%Y-%m", Correction::StripInvalidParts),
  ("%Y", Correction::StripInvalidParts),
];

#[derive(Debug, Clone, Copy)]
enum Correction {
  None,
  LimitMonthRange,
  StripInvalidParts,
}

impl Correction {
  fn apply(self, input: &str) -> String {
    match self {
      Self::None => input.to_string(),
      Self::LimitMonthRange => limit_month_range(input),
      Self::StripInvalidParts => strip_invalid_parts(input),
    }
  }
}

/// Normalize a raw legacy date into `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
///
/// Fails with [`Error::DateFormat`] when no candidate interpretation
/// succeeds — never a silently-accepted default.
pub fn normalize(raw: &str) -> Result<String> {
  let reshaped = reshape(raw.trim());

  for (template, correction) in CANDIDATES {
    let corrected = correction.apply(&reshaped);
    if let Some(date) = try_parse(&corrected, template) {
      let timestamp = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string());
      if let Some(timestamp) = timestamp {
        return Ok(timestamp);
      }
    }
  }

  Err(Error::DateFormat(raw.to_string()))
}

/// Reshape a contiguous 4/6/8-digit legacy string into hyphen-delimited
/// `YYYY[-MM[-DD]]`. Inputs that already contain a hyphen pass through.
fn reshape(raw: &str) -> String {
  if raw.contains('-') || !raw.chars().all(|c| c.is_ascii_digit()) {
    return raw.to_string();
  }
  let chunks = [raw.get(..4), raw.get(4..6), raw.get(6..8)];
  chunks
    .into_iter()
    .flatten()
    .filter(|c| !c.is_empty())
    .collect::<Vec<_>>()
    .join("-")
}

/// Parse `input` against a strftime `template`, defaulting the month and day
/// to 1 when the template leaves them unset.
fn try_parse(input: &str, template: &str) -> Option<NaiveDate> {
  let mut parsed = Parsed::new();
  parse(&mut parsed, input, StrftimeItems::new(template)).ok()?;
  let year = parsed.year?;
  let month = parsed.month.unwrap_or(1);
  let day = parsed.day.unwrap_or(1);
  NaiveDate::from_ymd_opt(year, month, day)
}

/// Keep only the first and last non-empty segments of a three-segment date
/// whose middle segment is a second textual month (a malformed range):
/// `2018-Oct-Dec` -> `2018-Dec`.
fn limit_month_range(input: &str) -> String {
  let parts: Vec<&str> = input
    .split('-')
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .collect();
  match (parts.first(), parts.last()) {
    (Some(first), Some(last)) if parts.len() > 1 => format!("{first}-{last}"),
    _ => input.to_string(),
  }
}

/// Walk segments left to right and stop accumulating at the first segment
/// that is empty, a zero value, a month exceeding 12 or a day exceeding 31.
/// Numeric segments are re-rendered without leading zeros.
fn strip_invalid_parts(input: &str) -> String {
  let mut kept: Vec<String> = Vec::new();
  for (index, part) in input.split('-').enumerate() {
    if part.is_empty() || part == "0" || part == "00" {
      break;
    }
    if part.chars().all(|c| c.is_ascii_digit()) {
      let value: u64 = part.parse().unwrap_or(u64::MAX);
      if index == 1 && value > 12 {
        break;
      }
      if index == 2 && value > 31 {
        break;
      }
      kept.push(value.to_string());
    } else {
      kept.push(part.to_string());
    }
  }
  kept.join("-")
}

/// Reshape an 8-digit publication date into `YYYY[-MM[-DD]]`, dropping
/// all-zero parts: `20200000` -> `2020`. Hyphenated input passes through.
pub fn hyphenate_pub_date(raw: &str) -> String {
  if raw.contains('-') {
    return raw.to_string();
  }
  let chunks = [raw.get(..4), raw.get(4..6), raw.get(6..8)];
  chunks
    .into_iter()
    .flatten()
    .filter(|c| !c.is_empty() && c.chars().any(|d| d != '0'))
    .collect::<Vec<_>>()
    .join("-")
}
