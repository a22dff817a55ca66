use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("vquiz"))
        } else {
            ProjectDirs::from("", "", "vquiz").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("vquiz.log"))
    }

    /// Exports land in the working directory unless configured otherwise.
    pub fn default_export_dir() -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_lives_in_state_dir() {
        if let (Some(state), Some(log)) = (AppDirs::state_dir(), AppDirs::log_path()) {
            assert_eq!(log.parent(), Some(state.as_path()));
            assert_eq!(log.file_name().unwrap(), "vquiz.log");
        }
    }
}
