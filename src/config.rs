use crate::ai_provider::AiProvider;
use crate::error::{ProcessMapError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 環境変数名
pub const ENV_API_KEY: &str = "PROCESS_MAP_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_BASE_URL: &str = "PROCESS_MAP_API_BASE_URL";
pub const ENV_MODEL: &str = "PROCESS_MAP_MODEL";
pub const ENV_TIMEOUT_SECONDS: &str = "PROCESS_MAP_TIMEOUT_SECONDS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub provider: AiProvider,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub cache_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            provider: AiProvider::default(),
            timeout_seconds: 60,
            temperature: 0.2,
            cache_enabled: false,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書き
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 指定パスから読み込む（存在しなければ既定値）
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ProcessMapError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("process-map").join("config.json"))
    }

    /// 環境変数による上書き（空文字は無視）
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY).or_else(|| get(ENV_OPENAI_API_KEY)) {
            self.api_key = Some(key);
        }
        if let Some(url) = get(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model = model;
        }
        if let Some(seconds) = get(ENV_TIMEOUT_SECONDS).and_then(|v| v.trim().parse().ok()) {
            self.timeout_seconds = seconds;
        }
    }

    pub fn get_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProcessMapError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    /// 表示用にマスクしたAPIキー
    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            None | Some("") => "未設定".to_string(),
            Some(key) if key.chars().count() <= 8 => "********".to_string(),
            Some(key) => {
                let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
                format!("********{}", tail)
            }
        }
    }
}
