//! Layered configuration: built-in defaults, an optional config file, then
//! `WIKIPATH_*` environment variables, in that order of increasing priority.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Worker threads used while building a `.wpindex`. Defaults to the
    /// number of logical CPUs.
    pub workers: usize,
    /// Upper bound on bidirectional-BFS expansion rounds for a query. `None`
    /// means unbounded.
    pub max_depth: Option<usize>,
    /// Address the HTTP server binds to.
    pub listen_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            workers: num_cpus::get(),
            max_depth: None,
            listen_addr: "127.0.0.1:8080".to_owned(),
        }
    }
}

impl Settings {
    /// Load settings, optionally layering a TOML/YAML/JSON config file (as
    /// picked by `config::File`'s extension sniffing) on top of the
    /// defaults, then environment variables on top of that.
    ///
    /// `WIKIPATH_WORKERS=4`, `WIKIPATH_MAX_DEPTH=6` and
    /// `WIKIPATH_LISTEN_ADDR=0.0.0.0:8080` override the corresponding field.
    pub fn load(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("workers", defaults.workers as i64)?
            .set_default("listen_addr", defaults.listen_addr.clone())?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("WIKIPATH"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let s = Settings::default();
        assert!(s.workers >= 1);
        assert_eq!(s.max_depth, None);
        assert_eq!(s.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn loads_with_no_config_file() {
        let s = Settings::load(None).unwrap();
        assert!(s.workers >= 1);
    }
}
