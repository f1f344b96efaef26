use std::{fs, path::PathBuf, time::Duration};

use client_core::{report::SchoolHeader, DEFAULT_LOOKUP_LATENCY};
use serde::Deserialize;
use tracing::warn;

pub const CONFIG_FILE: &str = "portal.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct PortalSettings {
    pub data_path: Option<PathBuf>,
    pub lookup_latency_ms: u64,
    pub school: SchoolHeader,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            data_path: None,
            lookup_latency_ms: DEFAULT_LOOKUP_LATENCY.as_millis() as u64,
            school: SchoolHeader::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    data_path: Option<PathBuf>,
    lookup_latency_ms: Option<u64>,
    school_name: Option<String>,
    school_address: Option<String>,
    school_contact: Option<String>,
}

impl PortalSettings {
    pub fn lookup_latency(&self) -> Duration {
        Duration::from_millis(self.lookup_latency_ms)
    }

    fn apply_file(&mut self, raw: &str) {
        let file_cfg = match toml::from_str::<FileConfig>(raw) {
            Ok(cfg) => cfg,
            Err(error) => {
                warn!(%error, file = CONFIG_FILE, "ignoring unreadable portal config");
                return;
            }
        };

        if let Some(v) = file_cfg.data_path {
            self.data_path = Some(v);
        }
        if let Some(v) = file_cfg.lookup_latency_ms {
            self.lookup_latency_ms = v;
        }
        if let Some(v) = file_cfg.school_name {
            self.school.name = v;
        }
        if let Some(v) = file_cfg.school_address {
            self.school.address = v;
        }
        if let Some(v) = file_cfg.school_contact {
            self.school.contact = v;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("PORTAL_DATA_PATH") {
            self.data_path = Some(PathBuf::from(v));
        }
        if let Some(v) = var("APP__DATA_PATH") {
            self.data_path = Some(PathBuf::from(v));
        }

        if let Some(v) = var("APP__LOOKUP_LATENCY_MS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.lookup_latency_ms = parsed;
            }
        }

        if let Some(v) = var("APP__SCHOOL_NAME") {
            self.school.name = v;
        }
    }
}

/// Defaults, then `portal.toml` in the working directory, then environment.
pub fn load_settings() -> PortalSettings {
    let mut settings = PortalSettings::default();

    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());

    settings
}
