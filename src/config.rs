//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::models::Roster;
use crate::resourcing::quarter_code;

/// Dashboard configuration.
#[derive(Clone, Debug, Default)]
pub struct DashboardConfig {
    /// Document store location (from BARDO_DB_PATH). Platform data dir when unset.
    pub db_path: Option<PathBuf>,
    /// Local cache directory (from BARDO_CACHE_DIR). In-memory cache when unset.
    pub cache_dir: Option<PathBuf>,
    /// Bearer token required on API requests (from BARDO_API_KEY)
    pub api_key: Option<String>,
    /// Allowed CORS origins (from BARDO_CORS_ORIGINS, comma-separated)
    pub cors_origins: Option<Vec<String>>,
    /// Team roster (from BARDO_PEOPLE, comma-separated)
    pub roster: Roster,
    /// Quarter shown by default (from BARDO_QUARTER). Derived from the date when unset.
    pub quarter: Option<String>,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let list = |name: &str| {
            var(name).map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
        };

        let roster = match list("BARDO_PEOPLE") {
            Some(people) if !people.is_empty() => Roster::new(people),
            _ => Roster::default(),
        };

        Self {
            db_path: var("BARDO_DB_PATH").map(PathBuf::from),
            cache_dir: var("BARDO_CACHE_DIR").map(PathBuf::from),
            api_key: var("BARDO_API_KEY"),
            cors_origins: list("BARDO_CORS_ORIGINS").filter(|o| !o.is_empty()),
            roster,
            quarter: var("BARDO_QUARTER"),
        }
    }

    /// The configured quarter, or the calendar quarter `today` falls in.
    pub fn current_quarter(&self, today: NaiveDate) -> String {
        self.quarter
            .clone()
            .unwrap_or_else(|| quarter_code(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> DashboardConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]);
        assert!(config.db_path.is_none());
        assert!(config.api_key.is_none());
        assert!(config.cors_origins.is_none());
        assert_eq!(config.roster, Roster::default());
    }

    #[test]
    fn reads_roster_and_origins_lists() {
        let config = config(&[
            ("BARDO_PEOPLE", "Mike, Cyril ,,"),
            ("BARDO_CORS_ORIGINS", "http://localhost:5173"),
            ("BARDO_API_KEY", "secret"),
        ]);
        assert_eq!(config.roster.people(), ["Mike", "Cyril"]);
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://localhost:5173".to_string()])
        );
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn blank_people_fall_back_to_default_roster() {
        let config = config(&[("BARDO_PEOPLE", " , ")]);
        assert_eq!(config.roster, Roster::default());
    }

    #[test]
    fn quarter_defaults_to_calendar_quarter() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        assert_eq!(config(&[]).current_quarter(today), "Q425");
        assert_eq!(
            config(&[("BARDO_QUARTER", "Q126")]).current_quarter(today),
            "Q126"
        );
    }
}
