use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Result status codes recognized by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Dns,
    Dnf,
    Ocs,
    Dsq,
    Ret,
    Dnc,
    Rdg,
}

impl StatusCode {
    pub const ALL: [StatusCode; 7] = [
        StatusCode::Dns,
        StatusCode::Dnf,
        StatusCode::Ocs,
        StatusCode::Dsq,
        StatusCode::Ret,
        StatusCode::Dnc,
        StatusCode::Rdg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Dns => "DNS",
            StatusCode::Dnf => "DNF",
            StatusCode::Ocs => "OCS",
            StatusCode::Dsq => "DSQ",
            StatusCode::Ret => "RET",
            StatusCode::Dnc => "DNC",
            StatusCode::Rdg => "RDG",
        }
    }

    /// Match a code case-insensitively ("dnf" == "DNF")
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single race result for one entrant.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreToken {
    /// Finishing position as recorded
    Finish(f64),
    Code(StatusCode),
    /// Non-numeric text that is not a known code. Scored like a non-finish.
    Unknown(String),
    /// No result recorded for this race yet
    Absent,
}

impl ScoreToken {
    /// Parse raw result text. Never fails: anything that is neither a number
    /// nor a known code becomes `Unknown`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return ScoreToken::Absent;
        }
        if let Ok(n) = s.parse::<f64>() {
            if n.is_finite() {
                return ScoreToken::Finish(n);
            }
        }
        match StatusCode::parse(s) {
            Some(code) => ScoreToken::Code(code),
            None => ScoreToken::Unknown(s.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ScoreToken::Absent)
    }

    pub fn is_dnc(&self) -> bool {
        matches!(self, ScoreToken::Code(StatusCode::Dnc))
    }
}

impl fmt::Display for ScoreToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreToken::Finish(n) => write!(f, "{}", n),
            ScoreToken::Code(code) => write!(f, "{}", code),
            ScoreToken::Unknown(raw) => f.write_str(raw),
            ScoreToken::Absent => Ok(()),
        }
    }
}

impl From<&str> for ScoreToken {
    fn from(s: &str) -> Self {
        ScoreToken::parse(s)
    }
}

impl From<f64> for ScoreToken {
    fn from(n: f64) -> Self {
        if n.is_finite() {
            ScoreToken::Finish(n)
        } else {
            ScoreToken::Unknown(n.to_string())
        }
    }
}

impl Serialize for ScoreToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Results files may hold numbers, strings or nulls for a race.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawToken {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for ScoreToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawToken>::deserialize(deserializer)? {
            Some(RawToken::Number(n)) => ScoreToken::from(n),
            Some(RawToken::Text(s)) => ScoreToken::parse(&s),
            None => ScoreToken::Absent,
        })
    }
}
