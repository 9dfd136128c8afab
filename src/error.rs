use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessMapError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`process-map config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("生成アダプタエラー: {0}")]
    Generator(String),

    #[error("生成アダプタがタイムアウトしました ({0}秒)")]
    GeneratorTimeout(u64),

    #[error("生成結果のパースに失敗: {0}")]
    GeneratorParse(String),

    #[error("出力エラー: {0}")]
    Export(String),

    #[error("CLI実行エラー: {0}")]
    Cli(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("対話入力エラー: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error(transparent)]
    Engine(#[from] process_map_common::Error),
}

pub type Result<T> = std::result::Result<T, ProcessMapError>;
