use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 生成アダプタの種類
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// OpenAI互換のHTTP API
    Http,
    /// Claude CLI
    #[default]
    Claude,
    /// Codex CLI
    Codex,
    /// Gemini CLI
    Gemini,
    /// 生成しない（決定的パイプラインのみ）
    #[serde(rename = "none")]
    #[value(name = "none")]
    Disabled,
}

impl AiProvider {
    /// ローカルCLIのコマンド名（CLI型のみ）
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            AiProvider::Claude => Some("claude"),
            AiProvider::Codex => Some("codex"),
            AiProvider::Gemini => Some("gemini"),
            AiProvider::Http | AiProvider::Disabled => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Http => "http",
            AiProvider::Claude => "claude",
            AiProvider::Codex => "codex",
            AiProvider::Gemini => "gemini",
            AiProvider::Disabled => "none",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
