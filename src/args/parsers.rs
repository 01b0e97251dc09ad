use std::time::Duration;

use super::types::PositiveUsize;
use crate::error::{AppError, AppResult, ValidationError};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60_000;
const MILLIS_PER_HOUR: u64 = 3_600_000;

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

/// Boolean values accepted from flags backed by environment variables such as
/// `NO_COLOR`.
pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

/// Parses `--timeout`: whole units with an optional `ms`, `s`, `m` or `h`
/// suffix. A bare number counts as seconds. Zero is rejected.
pub(crate) fn parse_timeout(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    let split = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    if digits.is_empty() {
        return Err(AppError::validation(ValidationError::TimeoutMalformed {
            value: value.to_owned(),
        }));
    }
    let amount: u64 = digits.parse().map_err(|err| {
        AppError::validation(ValidationError::TimeoutNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let millis_per_unit: u64 = match unit {
        "ms" => 1,
        "" | "s" => MILLIS_PER_SECOND,
        "m" => MILLIS_PER_MINUTE,
        "h" => MILLIS_PER_HOUR,
        other => {
            return Err(AppError::validation(ValidationError::TimeoutUnit {
                unit: other.to_owned(),
            }));
        }
    };
    let millis = amount.checked_mul(millis_per_unit).ok_or_else(|| {
        AppError::validation(ValidationError::TimeoutTooLarge {
            value: value.to_owned(),
        })
    })?;
    if millis == 0 {
        return Err(AppError::validation(ValidationError::TimeoutZero));
    }
    Ok(Duration::from_millis(millis))
}
