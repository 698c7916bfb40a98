//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_dashboard_sections() {
        let content = r#"
[data]
source = csv
csv_dir = data
start_date = 2010-01-01

[instruments]
primary = ADBE
primary_name = Adobe
sp = ^GSPC

[indicators]
set = SMA(10),RSI(14),LOGRET
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("data", "source"), Some("csv".to_string()));
        assert_eq!(adapter.get_string("instruments", "sp"), Some("^GSPC".to_string()));
        assert_eq!(
            adapter.get_string("indicators", "set"),
            Some("SMA(10),RSI(14),LOGRET".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nsource = csv\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(
            "[web]\nsession_idle_minutes = 15\n[sqlite]\npool_size = many\n",
        )
        .unwrap();
        assert_eq!(adapter.get_int("web", "session_idle_minutes", 60), 15);
        assert_eq!(adapter.get_int("web", "missing", 42), 42);
        assert_eq!(adapter.get_int("sqlite", "pool_size", 4), 4);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string("[x]\na = 0.25\nb = nope\n").unwrap();
        assert_eq!(adapter.get_double("x", "a", 0.0), 0.25);
        assert_eq!(adapter.get_double("x", "b", 99.9), 99.9);
        assert_eq!(adapter.get_double("x", "c", 1.5), 1.5);
    }

    #[test]
    fn get_bool_parses_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[x]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("x", "a", false));
        assert!(adapter.get_bool("x", "b", false));
        assert!(adapter.get_bool("x", "c", false));
        assert!(!adapter.get_bool("x", "d", true));
        assert!(!adapter.get_bool("x", "e", true));
        assert!(!adapter.get_bool("x", "f", true));
        assert!(adapter.get_bool("x", "g", true));
        assert!(!adapter.get_bool("x", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[sentiment]\npath = data/macro_sentiment_info.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("sentiment", "path"),
            Some("data/macro_sentiment_info.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
