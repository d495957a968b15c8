use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How many times a failed operation is tried again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RetriesRepr", into = "RetriesRepr")]
pub enum Retries {
    /// Retry at most this many times after the first attempt.
    Limited(u32),

    /// Retry until the operation succeeds or the session times out.
    Unbounded,
}

impl Retries {
    /// Total number of attempts allowed, `None` when unbounded.
    pub fn max_attempts(self) -> Option<usize> {
        match self {
            Retries::Limited(n) => Some((n as usize).saturating_add(1)),
            Retries::Unbounded => None,
        }
    }
}

impl Default for Retries {
    fn default() -> Self {
        Retries::Limited(3)
    }
}

impl From<u32> for Retries {
    fn from(n: u32) -> Self {
        Retries::Limited(n)
    }
}

impl fmt::Display for Retries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Retries::Limited(n) => write!(f, "{n}"),
            Retries::Unbounded => f.write_str(UNBOUNDED),
        }
    }
}

const UNBOUNDED: &str = "unbounded";

/// Serialized form of [`Retries`]: a count or the `"unbounded"` keyword.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RetriesRepr {
    Count(u32),
    Keyword(String),
}

impl TryFrom<RetriesRepr> for Retries {
    type Error = String;

    fn try_from(repr: RetriesRepr) -> Result<Self, Self::Error> {
        match repr {
            RetriesRepr::Count(n) => Ok(Retries::Limited(n)),
            RetriesRepr::Keyword(word) if word == UNBOUNDED => Ok(Retries::Unbounded),
            RetriesRepr::Keyword(word) => Err(format!(
                "invalid retries `{word}`, expected a count or \"{UNBOUNDED}\""
            )),
        }
    }
}

impl From<Retries> for RetriesRepr {
    fn from(retries: Retries) -> Self {
        match retries {
            Retries::Limited(n) => RetriesRepr::Count(n),
            Retries::Unbounded => RetriesRepr::Keyword(UNBOUNDED.to_owned()),
        }
    }
}

/// Policy of a retry session.
///
/// A zero `delay` retries immediately; a zero `timeout` disables the
/// session deadline. Durations are (de)serialized as whole milliseconds
/// under `delay_ms` and `timeout_ms`; missing fields take the defaults.
///
/// ```rust,ignore
/// let options: RetryOptions =
///     serde_json::from_str(r#"{ "retries": "unbounded", "timeout_ms": 500 }"#)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    pub retries: Retries,

    #[serde(rename = "delay_ms", with = "millis")]
    pub delay: Duration,

    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,
}

impl RetryOptions {
    /// Polling-friendly preset: retry every 10ms, forever, for at most
    /// 500ms.
    pub fn wait_for() -> Self {
        Self {
            retries: Retries::Unbounded,
            delay: Duration::from_millis(10),
            timeout: Duration::from_millis(500),
        }
    }

    pub fn retries(mut self, retries: impl Into<Retries>) -> Self {
        self.retries = retries.into();
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.retries = Retries::Unbounded;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RetryOptions {
    /// Three retries, no delay, no timeout.
    fn default() -> Self {
        Self {
            retries: Retries::default(),
            delay: Duration::ZERO,
            timeout: Duration::ZERO,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
