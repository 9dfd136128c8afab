//! ログ初期化
//!
//! 進捗表示は `println!`、診断は `tracing` で標準エラーへ出す。

use tracing_subscriber::EnvFilter;

/// 既定のフィルタ（`RUST_LOG` 未設定時）
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// tracing-subscriber を初期化（二重初期化は無視）
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "debug");
        assert_eq!(default_filter(false), "warn");
    }

    #[test]
    fn test_init_twice() {
        init_logging(false);
        init_logging(true);
    }
}
