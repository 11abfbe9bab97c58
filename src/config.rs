//! `console.conf`: connection and logging settings.
//!
//! Same key=value format as the theme and keybinding files. Missing keys keep
//! their defaults; unknown keys are ignored.

use std::fmt::Write as _;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Number of catalog roles offered on the create and update forms.
    pub role_preview: usize,
    pub log_file: String,
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            role_preview: 12,
            log_file: "directory-console.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            if val.is_empty() {
                continue;
            }
            match key {
                "base_url" => cfg.base_url = val.to_string(),
                "timeout_secs" => match val.parse() {
                    Ok(n) if n > 0 => cfg.timeout_secs = n,
                    _ => tracing::warn!(value = val, "ignoring invalid timeout_secs"),
                },
                "role_preview" => match val.parse() {
                    Ok(n) if n > 0 => cfg.role_preview = n,
                    _ => tracing::warn!(value = val, "ignoring invalid role_preview"),
                },
                "log_file" => cfg.log_file = val.to_string(),
                "log_level" => cfg.log_level = val.to_string(),
                _ => {}
            }
        }
        cfg
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        let mut buf = String::new();
        buf.push_str("# directory-console settings\n");
        buf.push_str("# base_url: root of the directory API\n");
        buf.push_str("# log_level: tracing filter, overridden by RUST_LOG\n\n");
        let _ = writeln!(&mut buf, "base_url = {}", self.base_url);
        let _ = writeln!(&mut buf, "timeout_secs = {}", self.timeout_secs);
        let _ = writeln!(&mut buf, "role_preview = {}", self.role_preview);
        let _ = writeln!(&mut buf, "log_file = {}", self.log_file);
        let _ = writeln!(&mut buf, "log_level = {}", self.log_level);
        std::fs::write(path, buf)
    }

    /// Load `path`, writing defaults there first when it is missing.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let cfg = Self::default();
        // Logging is not up yet; a failed write just means no file next run either.
        let _ = cfg.write_file(path);
        cfg
    }
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::{SystemTime, UNIX_EPOCH};

	fn temp_path(tag: &str) -> std::path::PathBuf {
		let mut path = std::env::temp_dir();
		let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
		path.push(format!("dc_{}_{}_{}.conf", tag, std::process::id(), nonce));
		path
	}

	#[test]
	fn parse_overrides_and_skips_bad_values() {
		let cfg = ConsoleConfig::parse(
			"# comment\nbase_url = https://dir.example.org/api\ntimeout_secs = 0\nrole_preview = 30\nwhatever = 1\nlog_level=debug\n",
		);
		assert_eq!(cfg.base_url, "https://dir.example.org/api");
		assert_eq!(cfg.timeout_secs, 15);
		assert_eq!(cfg.role_preview, 30);
		assert_eq!(cfg.log_level, "debug");
		assert_eq!(cfg.log_file, "directory-console.log");
	}

	#[test]
	fn load_or_init_writes_defaults_once() {
		let path = temp_path("console");
		let p = path.to_str().unwrap();
		let first = ConsoleConfig::load_or_init(p);
		assert_eq!(first, ConsoleConfig::default());
		assert!(path.exists());

		std::fs::write(&path, "base_url = http://10.0.0.5:8000\n").unwrap();
		let second = ConsoleConfig::load_or_init(p);
		assert_eq!(second.base_url, "http://10.0.0.5:8000");
		assert_eq!(second.timeout(), Duration::from_secs(15));
		let _ = std::fs::remove_file(&path);
	}
}
