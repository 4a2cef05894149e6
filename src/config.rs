use std::env;
use std::path::{Path, PathBuf};

pub const RECORDINGS_DIR_VAR: &str = "INTERACTFLOW_RECORDINGS_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    pub recordings_dir: PathBuf,
}

impl Config {
    /// Reads settings from the environment (a `.env` file is loaded first by
    /// `main`), falling back to `recordings/` under the install root.
    pub fn from_env() -> Self {
        let recordings_dir = env::var_os(RECORDINGS_DIR_VAR)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_recordings_dir);
        Config { recordings_dir }
    }

    /// Command-line flags win over the environment.
    pub fn with_recordings_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.recordings_dir = dir;
        }
        self
    }
}

pub fn default_recordings_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("recordings")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dir_is_under_install_root() {
        let dir = default_recordings_dir();
        assert!(dir.ends_with("recordings"));
        assert_eq!(dir.parent(), Some(Path::new(env!("CARGO_MANIFEST_DIR"))));
    }

    #[test]
    fn test_flag_overrides_configured_dir() {
        let config = Config {
            recordings_dir: PathBuf::from("from-env"),
        };
        assert_eq!(
            config.clone().with_recordings_dir(None).recordings_dir,
            PathBuf::from("from-env")
        );
        assert_eq!(
            config
                .with_recordings_dir(Some(PathBuf::from("from-flag")))
                .recordings_dir,
            PathBuf::from("from-flag")
        );
    }
}
