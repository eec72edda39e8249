// ABOUTME: Query parameter access and strict parsing for lifecycle operations.
// ABOUTME: Absent or empty values take defaults; malformed values are errors.

use crate::signal::{DEFAULT_KILL_SIGNAL, KillSignal, SignalError, parse_signal};
use std::collections::HashMap;
use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

/// Largest `t` the engine API can carry (a signed 32-bit second count).
const MAX_TIMEOUT_SECS: u64 = i32::MAX as u64;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("unable to parse parameter '{name}': {value}")]
    InvalidBool {
        name: &'static str,
        value: String,
        #[source]
        source: ParseBoolError,
    },

    #[error("unable to parse parameter 't': {value}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: TimeoutError,
    },

    #[error("unable to parse signal {value}")]
    InvalidSignal {
        value: String,
        #[source]
        source: SignalError,
    },

    #[error("{method} /containers/{{id}}?{name} parameter is not supported")]
    Unsupported {
        method: &'static str,
        name: &'static str,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid syntax: expected one of 1, t, true, 0, f, false")]
pub struct ParseBoolError;

#[derive(Debug, Error)]
pub enum TimeoutError {
    #[error(transparent)]
    Syntax(#[from] ParseIntError),

    #[error("timeout exceeds {} seconds", MAX_TIMEOUT_SECS)]
    OutOfRange,
}

/// Query string values, first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, treating an empty value the same as an absent one.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        for (key, value) in iter {
            map.entry(key.into()).or_insert_with(|| value.into());
        }
        Self(map)
    }
}

/// Boolean spellings accepted by the Docker API.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Optional boolean flag, `false` when absent.
pub fn bool_param(query: &QueryParams, name: &'static str) -> Result<bool, ParamError> {
    match query.get(name) {
        None => Ok(false),
        Some(raw) => parse_bool(raw).ok_or_else(|| ParamError::InvalidBool {
            name,
            value: raw.to_string(),
            source: ParseBoolError,
        }),
    }
}

/// Optional `t` timeout in whole seconds. Negative values and values the
/// engine cannot represent are rejected.
pub fn timeout_param(query: &QueryParams) -> Result<Option<Duration>, ParamError> {
    query
        .get("t")
        .map(|raw| {
            parse_timeout(raw).map_err(|source| ParamError::InvalidTimeout {
                value: raw.to_string(),
                source,
            })
        })
        .transpose()
}

fn parse_timeout(raw: &str) -> Result<Duration, TimeoutError> {
    let secs = raw.parse::<u64>()?;
    if secs > MAX_TIMEOUT_SECS {
        return Err(TimeoutError::OutOfRange);
    }
    Ok(Duration::from_secs(secs))
}

/// Optional `signal`, SIGKILL when absent.
pub fn signal_param(query: &QueryParams) -> Result<KillSignal, ParamError> {
    match query.get("signal") {
        None => Ok(DEFAULT_KILL_SIGNAL),
        Some(raw) => parse_signal(raw).map_err(|source| ParamError::InvalidSignal {
            value: raw.to_string(),
            source,
        }),
    }
}

/// Fail if `name` is present with any value; legacy parameters whose
/// semantics are not implemented are refused rather than ignored.
pub fn reject_param(
    query: &QueryParams,
    method: &'static str,
    name: &'static str,
) -> Result<(), ParamError> {
    if query.contains(name) {
        return Err(ParamError::Unsupported { method, name });
    }
    Ok(())
}
