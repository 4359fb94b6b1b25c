//! INI file configuration adapter.
//!
//! Serves the `[portfolio]`, `[data]`, `[evaluation]`, `[statistics]` and
//! `[report]` sections. Command-line flags are written over the file values
//! with [`FileConfigAdapter::set`] and [`FileConfigAdapter::remove`] before
//! validation. Blank values read as absent, so `end_date =` falls back to the
//! default end date.

use crate::domain::error::EvalError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EvalError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| EvalError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, EvalError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| EvalError::ConfigParse {
                file: "<string>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// A configuration with no sections; every lookup yields its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    /// Override a single value, e.g. from a command-line flag.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.config.set(section, key, Some(value.into()));
    }

    pub fn remove(&mut self, section: &str, key: &str) {
        self.config.remove_key(section, key);
    }

    /// Accepted spellings for `allow_short`.
    fn parse_flag(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    fn parsed<T: std::str::FromStr>(&self, section: &str, key: &str) -> Option<T> {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .filter(|v| !v.trim().is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.parsed(section, key).unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.parsed(section, key).unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .as_deref()
            .and_then(Self::parse_flag)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL: &str = r#"
[portfolio]
file = portfolios/balanced.csv

[data]
file = prices.csv

[evaluation]
start_date = 2020-01-01
end_date = 2024-12-31
allow_short = yes

[statistics]
trading_days = 260

[report]
output = out/chart.svg
width = 1200
"#;

    #[test]
    fn reads_every_section() {
        let adapter = FileConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(
            adapter.get_string("portfolio", "file"),
            Some("portfolios/balanced.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("evaluation", "start_date"),
            Some("2020-01-01".to_string())
        );
        assert!(adapter.get_bool("evaluation", "allow_short", false));
        assert_eq!(adapter.get_double("statistics", "trading_days", 252.0), 260.0);
        assert_eq!(adapter.get_int("report", "width", 1000), 1200);
        assert_eq!(adapter.get_int("report", "height", 600), 600);
    }

    #[test]
    fn missing_keys_and_sections_return_none() {
        let adapter = FileConfigAdapter::from_string("[data]\ndir = prices\n").unwrap();
        assert_eq!(adapter.get_string("data", "file"), None);
        assert_eq!(adapter.get_string("report", "output"), None);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let adapter = FileConfigAdapter::from_string("[evaluation]\nend_date =\n").unwrap();
        assert_eq!(adapter.get_string("evaluation", "end_date"), None);
    }

    #[test]
    fn typed_getters_fall_back_on_garbage() {
        let adapter = FileConfigAdapter::from_string(
            "[statistics]\ntrading_days = lots\n[report]\nwidth = wide\n[evaluation]\nallow_short = maybe\n",
        )
        .unwrap();
        assert_eq!(adapter.get_double("statistics", "trading_days", 252.0), 252.0);
        assert_eq!(adapter.get_int("report", "width", 1000), 1000);
        assert!(!adapter.get_bool("evaluation", "allow_short", false));
    }

    #[test]
    fn bool_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[x]\na = true\nb = YES\nc = 0\nd = no\ne = on\n").unwrap();
        assert!(adapter.get_bool("x", "a", false));
        assert!(adapter.get_bool("x", "b", false));
        assert!(!adapter.get_bool("x", "c", true));
        assert!(!adapter.get_bool("x", "d", true));
        assert!(adapter.get_bool("x", "e", false));
    }

    #[test]
    fn blank_numbers_use_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[report]\nwidth =\nheight = 480\n").unwrap();
        assert_eq!(adapter.get_int("report", "width", 1000), 1000);
        assert_eq!(adapter.get_int("report", "height", 600), 480);
    }

    #[test]
    fn empty_config_yields_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("portfolio", "file"), None);
        assert!(adapter.get_bool("evaluation", "allow_short", true));
    }

    #[test]
    fn set_overrides_file_values() {
        let mut adapter = FileConfigAdapter::from_string(FULL).unwrap();
        adapter.set("evaluation", "start_date", "2021-06-01");
        adapter.set("data", "dir", "prices");
        assert_eq!(
            adapter.get_string("evaluation", "start_date"),
            Some("2021-06-01".to_string())
        );
        assert_eq!(adapter.get_string("data", "dir"), Some("prices".to_string()));

        adapter.remove("data", "file");
        assert_eq!(adapter.get_string("data", "file"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[report]\noutput = /tmp/chart.svg\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "output"),
            Some("/tmp/chart.svg".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, EvalError::ConfigParse { .. }));
    }
}
