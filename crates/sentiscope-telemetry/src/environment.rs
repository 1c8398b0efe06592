//! Client environment snapshot attached to every telemetry record

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One id per process, so records from a single run can be grouped
fn session_id() -> &'static str {
    static SESSION: OnceLock<String> = OnceLock::new();
    SESSION.get_or_init(|| uuid::Uuid::new_v4().to_string())
}

/// Terminal geometry, when the shell exports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub columns: u16,
    pub rows: u16,
}

/// Attributes of the machine and session running the tool.
///
/// The attribute set is informational and may change between releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEnvironment {
    pub user_agent: String,
    pub language: String,
    pub timezone: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<Screen>,
    pub interactive: bool,
    /// Where the reviews came from
    pub source: String,
    pub session_id: String,
    #[serde(rename = "timestamp_client")]
    pub timestamp_client: i64,
    pub model: String,
}

impl ClientEnvironment {
    /// Capture the current environment
    pub fn capture(model: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent(),
            language: language(),
            timezone: timezone(),
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            screen: screen(),
            interactive: std::env::var_os("TERM").is_some(),
            source: source.into(),
            session_id: session_id().to_string(),
            timestamp_client: chrono::Utc::now().timestamp_millis(),
            model: model.into(),
        }
    }
}

fn user_agent() -> String {
    format!(
        "sentiscope/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn language() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|v| !v.is_empty())
        .map(|v| locale_tag(&v))
        .unwrap_or_else(|| "en-US".to_string())
}

/// `en_GB.UTF-8` becomes `en-GB`
fn locale_tag(locale: &str) -> String {
    let base = locale.split(['.', '@']).next().unwrap_or(locale);
    match base {
        "C" | "POSIX" | "" => "en-US".to_string(),
        other => other.replace('_', "-"),
    }
}

fn timezone() -> String {
    std::env::var("TZ")
        .ok()
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| chrono::Local::now().format("UTC%:z").to_string())
}

fn screen() -> Option<Screen> {
    let columns = std::env::var("COLUMNS").ok()?.parse().ok()?;
    let rows = std::env::var("LINES").ok()?.parse().ok()?;
    Some(Screen { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_tag() {
        assert_eq!(locale_tag("en_GB.UTF-8"), "en-GB");
        assert_eq!(locale_tag("de_DE@euro"), "de-DE");
        assert_eq!(locale_tag("C"), "en-US");
        assert_eq!(locale_tag("fr"), "fr");
    }

    #[test]
    fn test_capture() {
        let env = ClientEnvironment::capture("sst2", "reviews_test.tsv");
        assert!(env.user_agent.starts_with("sentiscope/"));
        assert_eq!(env.model, "sst2");
        assert_eq!(env.source, "reviews_test.tsv");
        assert!(env.timestamp_client > 0);

        let again = ClientEnvironment::capture("sst2", "reviews_test.tsv");
        assert_eq!(env.session_id, again.session_id);
    }

    #[test]
    fn test_serialized_keys() {
        let env = ClientEnvironment::capture("sst2", "reviews_test.tsv");
        let value = serde_json::to_value(&env).unwrap();
        assert!(value.get("userAgent").is_some());
        assert!(value.get("timestamp_client").is_some());
        assert!(value.get("sessionId").is_some());
    }
}
