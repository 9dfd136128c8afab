//! ローカルAI CLI（claude / codex / gemini）による生成

use super::{GenerationRequest, ProcessMapGenerator};
use crate::ai_provider::AiProvider;
use crate::error::{ProcessMapError, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

pub struct CommandGenerator {
    provider: AiProvider,
    program: String,
}

impl CommandGenerator {
    /// CLI型のプロバイダから作る（それ以外は `None`）
    pub fn for_provider(provider: AiProvider) -> Option<Self> {
        provider.command_name().map(|program| Self {
            provider,
            program: program.to_string(),
        })
    }

    /// 実行ファイルを差し替える（テスト・ラッパースクリプト用）
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn build_command(&self, prompt: &str) -> Command {
        let args = cli_args(self.provider, prompt);

        // Windowsではcmd /c経由
        #[cfg(windows)]
        let mut command = {
            let mut c = Command::new("cmd");
            c.arg("/c").arg(&self.program);
            c
        };

        #[cfg(not(windows))]
        let mut command = Command::new(&self.program);

        command.args(args).kill_on_drop(true);
        command
    }
}

/// プロバイダごとの引数
pub fn cli_args(provider: AiProvider, prompt: &str) -> Vec<String> {
    match provider {
        AiProvider::Claude => vec![
            "-p".into(),
            prompt.to_string(),
            "--output-format".into(),
            "text".into(),
        ],
        AiProvider::Codex => vec!["exec".into(), prompt.to_string()],
        AiProvider::Gemini => vec!["-p".into(), prompt.to_string()],
        AiProvider::Http | AiProvider::Disabled => Vec::new(),
    }
}

#[async_trait]
impl ProcessMapGenerator for CommandGenerator {
    fn name(&self) -> &str {
        self.provider.as_str()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        debug!("{} CLI: prompt {} chars", self.program, request.prompt.len());

        let output = self
            .build_command(&request.prompt)
            .output()
            .await
            .map_err(|e| ProcessMapError::Cli(format!("{} CLI実行エラー: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessMapError::Cli(format!(
                "{} CLI failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();
        let preview: String = response.chars().take(500).collect();
        debug!("{} CLI response: {}", self.program, preview);

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_provider() {
        assert!(CommandGenerator::for_provider(AiProvider::Http).is_none());
        let generator = CommandGenerator::for_provider(AiProvider::Gemini).unwrap();
        assert_eq!(generator.program(), "gemini");
        assert_eq!(generator.name(), "gemini");
    }

    #[test]
    fn test_cli_args() {
        assert_eq!(
            cli_args(AiProvider::Claude, "hi"),
            vec!["-p", "hi", "--output-format", "text"]
        );
        assert_eq!(cli_args(AiProvider::Codex, "hi"), vec!["exec", "hi"]);
        assert!(cli_args(AiProvider::Disabled, "hi").is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let generator = CommandGenerator::for_provider(AiProvider::Claude)
            .unwrap()
            .with_program("process-map-no-such-binary");
        let request = GenerationRequest::new("Retail", vec![], "m", None);
        let result = generator.generate(&request).await;
        assert!(matches!(result, Err(ProcessMapError::Cli(_))));
    }
}
