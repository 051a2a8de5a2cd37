use core::fmt;

/// Problems with boss configuration. Attacks absorb these at `start` by
/// finishing immediately; only config loading surfaces them to callers.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A required spawn anchor is not configured
    MissingAnchor(&'static str),
    /// A required hazard template is not configured
    MissingTemplate(&'static str),
    /// A tunable is outside its valid range
    InvalidValue { field: &'static str, value: f32 },
    /// The configuration file could not be read
    Io(String),
    /// The configuration file could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAnchor(name) => write!(f, "missing spawn anchor `{name}`"),
            Self::MissingTemplate(name) => write!(f, "missing hazard template `{name}`"),
            Self::InvalidValue { field, value } => {
                write!(f, "invalid value {value} for `{field}`")
            }
            Self::Io(message) => write!(f, "failed to read config: {message}"),
            Self::Parse(message) => write!(f, "failed to parse config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
