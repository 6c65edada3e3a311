use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct RcConfig {
    pub server_url: String,
    pub show_line_numbers: bool,
    pub notice_secs: u64,
    pub check_connection: bool,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_BASE_URL.to_string(),
            show_line_numbers: true,
            notice_secs: 3,
            check_connection: true,
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Path of the rc file, checking the current directory first and the
    /// home directory (~/.pyevalrc) second.
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(".pyevalrc");
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(".pyevalrc");
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Loads the rc file if one exists. An unreadable file is ignored.
    pub fn load_config() -> RcConfig {
        let mut config = RcConfig::default();

        if let Some(rc_path) = Self::get_rc_path() {
            if let Ok(content) = fs::read_to_string(&rc_path) {
                Self::parse_config_content(&content, &mut config);
            }
        }

        config
    }

    fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = if let Some(pos) = line.find('#') {
            &line[..pos]
        } else {
            line
        }
        .trim();

        // Handle "set" commands (vim-style)
        if let Some(stripped) = line.strip_prefix("set ") {
            let setting = stripped.trim();

            if setting == "nu" || setting == "number" {
                config.show_line_numbers = true;
            } else if setting == "nonu" || setting == "nonumber" {
                config.show_line_numbers = false;
            } else if setting == "connect" {
                config.check_connection = true;
            } else if setting == "noconnect" {
                config.check_connection = false;
            } else if let Some(value) = setting.strip_prefix("server=") {
                Self::set_server(value, config);
            } else if let Some(value) = setting.strip_prefix("notice=") {
                Self::set_notice_secs(value, config);
            }
        }
        // Handle direct key-value pairs
        else if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();

            match key {
                "server" | "server_url" => Self::set_server(value, config),
                "linenumbers" | "line_numbers" | "number" => {
                    config.show_line_numbers = value == "true" || value == "1" || value == "yes";
                }
                "notice" | "notice_secs" => Self::set_notice_secs(value, config),
                "connect" | "check_connection" => {
                    config.check_connection = value == "true" || value == "1" || value == "yes";
                }
                _ => {} // Unknown setting, ignore
            }
        }
    }

    fn set_server(value: &str, config: &mut RcConfig) {
        if value.starts_with("http://") || value.starts_with("https://") {
            config.server_url = value.to_string();
        }
    }

    fn set_notice_secs(value: &str, config: &mut RcConfig) {
        if let Ok(secs) = value.parse::<u64>() {
            if (1..=30).contains(&secs) {
                config.notice_secs = secs;
            }
        }
    }

    /// Generate a sample rc file content
    pub fn generate_sample_rc() -> String {
        r#"# pyeval configuration file (.pyevalrc)
# Lines starting with # or " are comments

# Evaluation server
set server=http://127.0.0.1:5000
set connect            # Probe the server at startup (or set noconnect)

# Display settings
set nu                 # Show line numbers (or set nonu to disable)
set notice=3           # Seconds a notice stays on screen (1-30)

# Alternative key=value syntax:
# server_url=http://127.0.0.1:5000
# line_numbers=true
# notice_secs=3
# check_connection=false
"#
        .to_string()
    }
}
