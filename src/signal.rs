// ABOUTME: Signal parsing for the kill endpoint.
// ABOUTME: Accepts numbers or names, with or without the SIG prefix, including real-time signals.

use nix::sys::signal::Signal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Signal sent by kill when the client does not name one.
pub const DEFAULT_KILL_SIGNAL: KillSignal = KillSignal(Signal::SIGKILL as i32);

/// First and last real-time signal numbers of a Linux container.
const SIGRTMIN: i32 = 34;
const SIGRTMAX: i32 = 64;

/// Largest `n` accepted in `RTMIN+n`; `RTMAX-n` stops one short of it.
const RT_OFFSET_MAX: i32 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("invalid signal: {0}")]
    Invalid(String),
}

/// A signal number to deliver to a container's main process.
///
/// The number is forwarded to the engine as-is, so it covers signals the
/// host has no name for, such as `SIGRTMIN+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KillSignal(i32);

impl KillSignal {
    pub fn number(self) -> i32 {
        self.0
    }
}

impl From<Signal> for KillSignal {
    fn from(signal: Signal) -> Self {
        KillSignal(signal as i32)
    }
}

impl fmt::Display for KillSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            SIGRTMIN => f.write_str("SIGRTMIN"),
            SIGRTMAX => f.write_str("SIGRTMAX"),
            n if n > SIGRTMIN && n - SIGRTMIN <= RT_OFFSET_MAX => {
                write!(f, "SIGRTMIN+{}", n - SIGRTMIN)
            }
            n if n > SIGRTMIN && n < SIGRTMAX => write!(f, "SIGRTMAX-{}", SIGRTMAX - n),
            n => match Signal::try_from(n) {
                Ok(signal) => f.write_str(signal.as_str()),
                Err(_) => write!(f, "{}", n),
            },
        }
    }
}

/// Parse a client-supplied signal.
///
/// Numbers from 1 to 255 are taken verbatim. Names are matched
/// case-insensitively with an optional `SIG` prefix, so `kill`, `KILL` and
/// `SIGKILL` are equivalent, and `RTMIN+n` / `RTMAX-n` name real-time
/// signals.
pub fn parse_signal(raw: &str) -> Result<KillSignal, SignalError> {
    let invalid = || SignalError::Invalid(raw.to_string());
    let trimmed = raw.trim();

    if let Ok(number) = trimmed.parse::<u8>() {
        if number == 0 {
            return Err(invalid());
        }
        return Ok(KillSignal(i32::from(number)));
    }

    let upper = trimmed.to_ascii_uppercase();
    let name = upper.strip_prefix("SIG").unwrap_or(&upper);
    if name.is_empty() {
        return Err(invalid());
    }

    if let Some(number) = parse_realtime(name) {
        return Ok(KillSignal(number));
    }

    Signal::from_str(&format!("SIG{name}"))
        .map(KillSignal::from)
        .map_err(|_| invalid())
}

/// `RTMIN`, `RTMIN+n`, `RTMAX` or `RTMAX-n`, without the `SIG` prefix.
fn parse_realtime(name: &str) -> Option<i32> {
    if let Some(rest) = name.strip_prefix("RTMIN") {
        return match rest {
            "" => Some(SIGRTMIN),
            _ => rt_offset(rest.strip_prefix('+')?, RT_OFFSET_MAX).map(|n| SIGRTMIN + n),
        };
    }
    if let Some(rest) = name.strip_prefix("RTMAX") {
        return match rest {
            "" => Some(SIGRTMAX),
            _ => rt_offset(rest.strip_prefix('-')?, RT_OFFSET_MAX - 1).map(|n| SIGRTMAX - n),
        };
    }
    None
}

fn rt_offset(digits: &str, max: i32) -> Option<i32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().filter(|n| (1..=max).contains(n))
}
