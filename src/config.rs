use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::question::{QuestionKind, DEFAULT_BANK};
use crate::settings::{Difficulty, QuizSettings, DEFAULT_TIME_LIMIT_SECS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bank: String,
    pub question_count: usize,
    pub difficulty: Difficulty,
    pub question_types: Vec<QuestionKind>,
    pub time_limit_secs: u64,
    pub shuffle: bool,
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank: DEFAULT_BANK.to_string(),
            question_count: 5,
            difficulty: Difficulty::Medium,
            question_types: vec![QuestionKind::MultipleChoice],
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            shuffle: false,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn settings(&self) -> QuizSettings {
        QuizSettings {
            question_count: self.question_count,
            difficulty: self.difficulty,
            question_types: self.question_types.clone(),
            time_limit_secs: self.time_limit_secs,
            shuffle: self.shuffle,
        }
    }

    pub fn apply_settings(&mut self, settings: &QuizSettings) {
        self.question_count = settings.question_count;
        self.difficulty = settings.difficulty;
        self.question_types = settings.question_types.clone();
        self.time_limit_secs = settings.time_limit_secs;
        self.shuffle = settings.shuffle;
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "vquiz") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("vquiz_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!(path = %self.path.display(), "ignoring bad config: {e}"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
