use color_eyre::eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::PathBuf,
    sync::{OnceLock, RwLock},
};

/// Globally accessible application configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_practice_question_count_value")]
    pub practice_question_count: usize,
    #[serde(default = "default_preferred_exam_value")]
    pub preferred_exam: ExamKind,
    #[serde(default)]
    pub write_debug_log: bool,
}

impl AppConfig {
    fn normalize(&mut self) {
        if self.practice_question_count == 0 {
            self.practice_question_count = DEFAULT_PRACTICE_QUESTION_COUNT;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            practice_question_count: DEFAULT_PRACTICE_QUESTION_COUNT,
            preferred_exam: default_preferred_exam_value(),
            write_debug_log: false,
        }
    }
}

const DEFAULT_PRACTICE_QUESTION_COUNT: usize = 5;
const fn default_preferred_exam_value() -> ExamKind {
    ExamKind::Jee
}

const CONFIG_FILE_PATH: &str = "config/app_config.toml";

static APP_CONFIG: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn config_lock() -> &'static RwLock<AppConfig> {
    APP_CONFIG.get_or_init(|| RwLock::new(AppConfig::default()))
}

/// Attempt to load configuration from disk. If loading fails, the in-memory config will be reset to defaults
/// and the error will be returned for the caller to surface if desired.
pub fn initialize() -> Result<()> {
    match load_config_from_disk() {
        Ok(config) => {
            let lock = config_lock();
            *lock.write().expect("config lock poisoned") = config;
            Ok(())
        }
        Err(err) => {
            let lock = config_lock();
            *lock.write().expect("config lock poisoned") = AppConfig::default();
            Err(err)
        }
    }
}

/// Retrieve a clone of the current configuration.
pub fn current() -> AppConfig {
    config_lock().read().expect("config lock poisoned").clone()
}

/// Convenience accessor for the configured `practice_question_count` value.
pub fn practice_question_count() -> usize {
    config_lock()
        .read()
        .expect("config lock poisoned")
        .practice_question_count
}

/// Convenience accessor for the configured debug-log toggle.
pub fn write_debug_log() -> bool {
    config_lock()
        .read()
        .expect("config lock poisoned")
        .write_debug_log
}

/// Apply the provided mutation to the in-memory configuration and persist the result to disk.
pub fn update<F>(mutator: F) -> Result<AppConfig>
where
    F: FnOnce(&mut AppConfig),
{
    let lock = config_lock();
    let mut config = lock.write().expect("config lock poisoned");
    mutator(&mut config);
    config.normalize();
    save_config_to_disk(&config)?;
    Ok(config.clone())
}

/// Absolute path to the configuration file used for persistence.
pub fn config_file_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_PATH)
}

fn load_config_from_disk() -> Result<AppConfig> {
    let path = config_file_path();
    match fs::read_to_string(&path) {
        Ok(contents) => {
            let mut config: AppConfig = toml::from_str(&contents)
                .wrap_err_with(|| format!("failed to parse configuration at {}", path.display()))?;
            config.normalize();
            Ok(config)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => Err(eyre!(format!(
            "failed to read configuration at {}: {}",
            path.display(),
            err
        ))),
    }
}

fn save_config_to_disk(config: &AppConfig) -> Result<()> {
    let path = config_file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).wrap_err_with(|| {
            format!(
                "failed to create configuration directory {}",
                parent.display()
            )
        })?;
    }
    let serialized =
        toml::to_string_pretty(config).wrap_err("failed to serialize configuration to TOML")?;
    fs::write(&path, serialized)
        .wrap_err_with(|| format!("failed to write configuration to {}", path.display()))
}

const fn default_practice_question_count_value() -> usize {
    DEFAULT_PRACTICE_QUESTION_COUNT
}

/// Examination track the library ordering and quick-start challenge default to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamKind {
    Jee,
    Neet,
}

impl ExamKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Jee => "JEE",
            Self::Neet => "NEET",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Jee => Self::Neet,
            Self::Neet => Self::Jee,
        }
    }

    pub fn previous(self) -> Self {
        self.next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigField {
    PracticeQuestions,
    PreferredExam,
    DebugLog,
}

#[derive(Debug, Clone)]
pub struct ConfigForm {
    pub(crate) practice_question_count: usize,
    pub(crate) preferred_exam: ExamKind,
    pub(crate) write_debug_log: bool,
    field: ConfigField,
    pub(crate) dirty: bool,
    pub(crate) status: Option<String>,
}

impl ConfigForm {
    pub(crate) fn from_config(config: AppConfig) -> Self {
        Self {
            practice_question_count: config.practice_question_count,
            preferred_exam: config.preferred_exam,
            write_debug_log: config.write_debug_log,
            field: ConfigField::PracticeQuestions,
            dirty: false,
            status: None,
        }
    }

    pub(crate) fn selected_index(&self) -> usize {
        self.field.index()
    }

    pub(crate) fn select_next(&mut self) {
        self.field = self.field.next();
    }

    pub(crate) fn select_previous(&mut self) {
        self.field = self.field.previous();
    }

    pub(crate) fn adjust_current(&mut self, delta: isize) {
        if delta == 0 {
            return;
        }

        if matches!(self.field, ConfigField::PreferredExam) {
            let updated = if delta > 0 {
                self.preferred_exam.next()
            } else {
                self.preferred_exam.previous()
            };
            if updated != self.preferred_exam {
                self.preferred_exam = updated;
                self.dirty = true;
                self.status = None;
            }
            return;
        }

        if matches!(self.field, ConfigField::DebugLog) {
            self.write_debug_log = !self.write_debug_log;
            self.dirty = true;
            self.status = None;
            return;
        }

        let current = self.practice_question_count as isize;
        let updated = (current + delta).max(1) as usize;
        if updated != self.practice_question_count {
            self.practice_question_count = updated;
            self.dirty = true;
            self.status = None;
        }
    }

    pub(crate) fn apply_saved(&mut self, config: AppConfig) {
        self.practice_question_count = config.practice_question_count;
        self.preferred_exam = config.preferred_exam;
        self.write_debug_log = config.write_debug_log;
        self.dirty = false;
        self.status = None;
    }

    pub(crate) fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = Some(status.into());
    }
}

impl ConfigField {
    fn index(self) -> usize {
        match self {
            Self::PracticeQuestions => 0,
            Self::PreferredExam => 1,
            Self::DebugLog => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            Self::PracticeQuestions => Self::PreferredExam,
            Self::PreferredExam => Self::DebugLog,
            Self::DebugLog => Self::PracticeQuestions,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::PracticeQuestions => Self::DebugLog,
            Self::PreferredExam => Self::PracticeQuestions,
            Self::DebugLog => Self::PreferredExam,
        }
    }
}
