//! rdmatop configuration persistence (htoprc-style key=value format)
//!
//! Saves/loads settings to `$XDG_CONFIG_HOME/rdmatop/rdmatoprc`, falling back
//! to `~/.config/rdmatop/rdmatoprc`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::color_scheme::ColorSchemeId;

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/infiniband";

const MIN_INTERVAL_SECS: f64 = 0.05;
const MAX_INTERVAL_SECS: f64 = 60.0;

/// Get the config file path
pub fn config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("rdmatop").join("rdmatoprc"))
}

/// Persistable settings. Command line flags override these.
#[derive(Debug, Clone, PartialEq)]
pub struct RdmatopConfig {
    pub interval_secs: f64,
    pub port: u32,
    /// Port data counters count in lane-width units; multiply to get bytes.
    pub byte_multiplier: f64,
    pub sysfs_root: PathBuf,
    pub color_scheme_id: ColorSchemeId,
    pub log_file: Option<PathBuf>,
}

impl Default for RdmatopConfig {
    fn default() -> Self {
        Self {
            interval_secs: 0.25,
            port: 1,
            byte_multiplier: 4.0,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            color_scheme_id: ColorSchemeId::Default,
            log_file: None,
        }
    }
}

impl RdmatopConfig {
    /// Load config from file, returning defaults if file doesn't exist
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse `key=value` lines. Unknown keys and bad values are ignored.
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();
                match key {
                    "interval_secs" => {
                        if let Some(v) = value.parse::<f64>().ok().filter(|v| v.is_finite()) {
                            cfg.interval_secs = clamp_interval(v);
                        }
                    }
                    "port" => {
                        if let Ok(v) = value.parse::<u32>() {
                            cfg.port = v;
                        }
                    }
                    "byte_multiplier" => {
                        if let Some(v) = value.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0) {
                            cfg.byte_multiplier = v;
                        }
                    }
                    "sysfs_root" => {
                        if !value.is_empty() {
                            cfg.sysfs_root = PathBuf::from(value);
                        }
                    }
                    "color_scheme" => {
                        if let Ok(idx) = value.parse::<usize>() {
                            cfg.color_scheme_id = ColorSchemeId::from_index(idx);
                        }
                    }
                    "log_file" => {
                        cfg.log_file = if value.is_empty() {
                            None
                        } else {
                            Some(PathBuf::from(value))
                        };
                    }
                    _ => {} // Ignore unknown keys
                }
            }
        }

        cfg
    }

    /// Render the file contents `save` writes.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        lines.push("# rdmatop configuration file".to_string());
        lines.push(String::new());
        lines.push(format!("interval_secs={}", self.interval_secs));
        lines.push(format!("port={}", self.port));
        lines.push(format!("byte_multiplier={}", self.byte_multiplier));
        lines.push(format!("sysfs_root={}", self.sysfs_root.display()));
        lines.push(format!("color_scheme={}", self.color_scheme_id as usize));
        lines.push(format!(
            "log_file={}",
            self.log_file.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
        ));
        lines.join("\n") + "\n"
    }

    /// Save config to file
    pub fn save(&self) -> Result<PathBuf, String> {
        let path = config_path().ok_or_else(|| "Could not determine config path".to_string())?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let mut file = fs::File::create(path)
            .map_err(|e| format!("Failed to create config file: {}", e))?;
        file.write_all(self.render().as_bytes())
            .map_err(|e| format!("Failed to write config file: {}", e))?;

        Ok(())
    }
}

pub fn clamp_interval(secs: f64) -> f64 {
    secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let cfg = RdmatopConfig::load_from(&dir.path().join("absent"));
        assert_eq!(cfg, RdmatopConfig::default());
        assert_eq!(cfg.interval_secs, 0.25);
        assert_eq!(cfg.byte_multiplier, 4.0);
    }

    #[test]
    fn parses_known_keys_and_ignores_noise() {
        let cfg = RdmatopConfig::parse(
            "# comment\n\
             interval_secs = 0.5\n\
             port=2\n\
             byte_multiplier=8\n\
             sysfs_root=/tmp/ib\n\
             color_scheme=1\n\
             log_file=/tmp/rdmatop.log\n\
             unknown=whatever\n\
             garbage line\n",
        );
        assert_eq!(cfg.interval_secs, 0.5);
        assert_eq!(cfg.port, 2);
        assert_eq!(cfg.byte_multiplier, 8.0);
        assert_eq!(cfg.sysfs_root, PathBuf::from("/tmp/ib"));
        assert_eq!(cfg.color_scheme_id, ColorSchemeId::Monochrome);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/rdmatop.log")));
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let cfg = RdmatopConfig::parse("port=-1\nbyte_multiplier=0\ninterval_secs=NaN\n");
        assert_eq!(cfg, RdmatopConfig::default());
    }

    #[test]
    fn interval_is_clamped() {
        assert_eq!(RdmatopConfig::parse("interval_secs=0.001").interval_secs, 0.05);
        assert_eq!(RdmatopConfig::parse("interval_secs=600").interval_secs, 60.0);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("rdmatoprc");
        let cfg = RdmatopConfig {
            interval_secs: 1.5,
            port: 2,
            byte_multiplier: 4.0,
            sysfs_root: PathBuf::from("/srv/ib"),
            color_scheme_id: ColorSchemeId::Monochrome,
            log_file: None,
        };
        cfg.save_to(&path).expect("save");
        assert_eq!(RdmatopConfig::load_from(&path), cfg);
    }
}
