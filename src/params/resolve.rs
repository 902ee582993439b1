//! Type-specific coercion rules for raw parameter values

use super::source::Parameter;
use serde_json::{Map, Value};
use thiserror::Error;

/// Limit used when none (or an unusable one) is supplied
pub const DEFAULT_LIMIT: u32 = 3;

/// Tokens accepted as `true` by [`resolve_optional_boolean`]
const TRUE_TOKENS: [&str; 4] = ["true", "1", "yes", "y"];

/// Tokens accepted as `false` by [`resolve_optional_boolean`]
const FALSE_TOKENS: [&str; 4] = ["false", "0", "no", "n"];

/// Errors raised while resolving request parameters
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// A required parameter is blank in every source
    #[error("{0}")]
    MissingParameter(String),

    /// Filter text is not JSON, or not a JSON object
    #[error("Invalid filter JSON: {0}")]
    InvalidFilter(String),

    /// Fields text looks like a JSON array but is not one
    #[error("Invalid fields JSON: {0}")]
    InvalidFields(String),

    /// A numeric parameter is not a valid number
    #[error("Invalid numeric value for `{parameter}`: {value}")]
    InvalidNumber { parameter: Parameter, value: String },
}

/// Returns `None` for absent or whitespace-only input, else the trimmed text
fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse numeric text: decimal or exponent notation, plus unsigned
/// `0x`/`0o`/`0b` integer literals
fn parse_number(text: &str) -> Option<f64> {
    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => return text.parse::<f64>().ok(),
    };
    let digits = &text[2..];
    if digits.starts_with(['+', '-']) {
        return None;
    }
    u128::from_str_radix(digits, radix)
        .ok()
        .map(|value| value as f64)
}

/// Integer value of `value` when it has no fractional part and is exactly representable
pub(crate) fn whole_number(value: f64) -> Option<i64> {
    // 2^53: beyond this not every integer is representable
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT).then_some(value as i64)
}

/// Text form of a JSON number: whole values without a fractional part
fn number_text(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(value) => match whole_number(value) {
            Some(whole) => whole.to_string(),
            None => value.to_string(),
        },
        None => number.to_string(),
    }
}

/// First non-blank value among `primary` and `fallback`, trimmed
pub fn resolve_required_string(
    primary: Option<&str>,
    fallback: Option<&str>,
    message: &str,
) -> Result<String, ResolveError> {
    non_blank(primary)
        .or_else(|| non_blank(fallback))
        .map(str::to_string)
        .ok_or_else(|| ResolveError::MissingParameter(message.to_string()))
}

/// Result limit, falling back to [`DEFAULT_LIMIT`] when absent, unparsable or not positive
pub fn resolve_limit(raw: Option<&str>) -> u32 {
    let parsed = match non_blank(raw).and_then(parse_number) {
        Some(value) if value.is_finite() => value,
        _ => return DEFAULT_LIMIT,
    };

    if parsed <= 0.0 {
        return DEFAULT_LIMIT;
    }

    // `as` saturates at u32::MAX
    parsed.max(1.0).floor() as u32
}

/// Optional filter expression; must be a JSON object
pub fn resolve_filter(raw: Option<&str>) -> Result<Option<Map<String, Value>>, ResolveError> {
    let Some(trimmed) = non_blank(raw) else {
        return Ok(None);
    };

    let parsed: Value = serde_json::from_str(trimmed)
        .map_err(|e| ResolveError::InvalidFilter(e.to_string()))?;

    match parsed {
        Value::Object(map) => Ok(Some(map)),
        Value::Array(_) => Err(ResolveError::InvalidFilter(
            "Filter JSON must describe an object, not an array.".to_string(),
        )),
        _ => Err(ResolveError::InvalidFilter(
            "Filter JSON must describe an object.".to_string(),
        )),
    }
}

/// Optional field list, either a JSON array or a comma-separated list
///
/// Elements are trimmed and blanks dropped. Order and duplicates are kept.
/// Numbers render without a trailing `.0`; other non-string elements are
/// rendered as their JSON text.
pub fn resolve_fields(raw: Option<&str>) -> Result<Option<Vec<String>>, ResolveError> {
    let Some(trimmed) = non_blank(raw) else {
        return Ok(None);
    };

    if !trimmed.starts_with('[') {
        let fields = trimmed
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect();
        return Ok(Some(fields));
    }

    let parsed: Value = serde_json::from_str(trimmed)
        .map_err(|e| ResolveError::InvalidFields(e.to_string()))?;

    let Value::Array(items) = parsed else {
        return Err(ResolveError::InvalidFields(
            "fields must be a JSON array or comma-separated list.".to_string(),
        ));
    };

    let fields = items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => s,
            Value::Number(n) => number_text(&n),
            other => other.to_string(),
        })
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect();

    Ok(Some(fields))
}

/// Optional number; present values must parse to a finite number
pub fn resolve_optional_number(
    parameter: Parameter,
    raw: Option<&str>,
) -> Result<Option<f64>, ResolveError> {
    let Some(trimmed) = non_blank(raw) else {
        return Ok(None);
    };

    match parse_number(trimmed) {
        Some(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ResolveError::InvalidNumber {
            parameter,
            value: trimmed.to_string(),
        }),
    }
}

/// Optional boolean flag
///
/// Unrecognized tokens resolve to `None` rather than an error.
pub fn resolve_optional_boolean(raw: Option<&str>) -> Option<bool> {
    let normalized = non_blank(raw)?.to_lowercase();

    if TRUE_TOKENS.contains(&normalized.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Trimmed text, or `None` when blank
pub fn resolve_trimmed_optional_string(raw: Option<&str>) -> Option<String> {
    non_blank(raw).map(str::to_string)
}
