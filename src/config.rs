use std::env;
use std::path::PathBuf;

const LOG_FILE: &str = "taskkeep.log";

/// Where persisted state and the log file live. `TASKKEEP_DATA_DIR`
/// overrides the working-directory default.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = env::var_os("TASKKEEP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { data_dir }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}
