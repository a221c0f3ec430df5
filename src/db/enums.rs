use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery platform an endpoint was registered for.
///
/// Unknown platform names are kept verbatim in `Other` so that newer clients
/// can register before the server knows how to shape their envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlatformVariant {
    Web,
    Android,
    Other(String),
}

impl PlatformVariant {
    pub fn as_str(&self) -> &str {
        match self {
            PlatformVariant::Web => "web",
            PlatformVariant::Android => "android",
            PlatformVariant::Other(name) => name,
        }
    }
}

impl From<&str> for PlatformVariant {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "web" => PlatformVariant::Web,
            "android" => PlatformVariant::Android,
            _ => PlatformVariant::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for PlatformVariant {
    fn from(value: String) -> Self {
        PlatformVariant::from(value.as_str())
    }
}

impl From<PlatformVariant> for String {
    fn from(value: PlatformVariant) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PlatformVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tag of a persisted log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LogType {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogType::Info => "info",
            LogType::Warning => "warning",
            LogType::Error => "error",
        };
        f.write_str(name)
    }
}
