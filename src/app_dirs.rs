use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "drillgen";

/// Overrides every location below; used by tests and portable installs
pub const HOME_ENV: &str = "DRILLGEN_HOME";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        if let Some(dir) = Self::override_dir() {
            return Some(dir.join("progress.db"));
        }
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home).join(".local").join("state").join(APP_NAME);
            Some(state_dir.join("progress.db"))
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().join("progress.db"))
        }
    }

    pub fn config_path() -> PathBuf {
        if let Some(dir) = Self::override_dir() {
            return dir.join("config.json");
        }
        match ProjectDirs::from("", "", APP_NAME) {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("drillgen_config.json"),
        }
    }

    fn override_dir() -> Option<PathBuf> {
        std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()).map(PathBuf::from)
    }
}
