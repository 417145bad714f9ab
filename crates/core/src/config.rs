use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendSettings,
    pub classifier: ClassifierSettings,
    pub quiz: QuizConfig,
    pub capture: CaptureDefaults,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    pub predict_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    pub max_questions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureDefaults {
    pub food_name: String,
    pub food_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendSettings {
                base_url: "http://localhost:3000".to_string(),
            },
            classifier: ClassifierSettings {
                predict_url: "http://localhost:8000".to_string(),
            },
            quiz: QuizConfig {
                max_questions: crate::questions::DEFAULT_QUESTION_LIMIT,
            },
            capture: CaptureDefaults {
                food_name: "Sample Food".to_string(),
                food_type: "Sample Type".to_string(),
            },
            http: HttpConfig { timeout_secs: 30 },
            database: DatabaseConfig {
                path: "data/spoiler.db".to_string(),
            },
        }
    }
}

/// Layers: built-in defaults, then the config file, then `SPOILER__SECTION__KEY` env vars.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let defaults = config::Config::try_from(&AppConfig::default())?;
    let mut settings = config::Config::builder().add_source(defaults);
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("SPOILER")
            .prefix_separator("__")
            .separator("__"),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
