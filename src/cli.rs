use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use process_map_common::LayoutView;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "process-map")]
#[command(about = "業界ベンチマークからISO 9001プロセスマップを合成・出力するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 生成アダプタ (http/claude/codex/gemini/none)。省略時は設定ファイルの値
    #[arg(long, global = true)]
    pub provider: Option<AiProvider>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 業界名とプロセス一覧からプロセスマップJSONを生成
    Generate {
        /// 業界名（例: Manufacturing, Healthcare）
        #[arg(required = true)]
        industry: String,

        /// プロセス一覧ファイル（1行1プロセス）
        #[arg(short = 'f', long)]
        processes_file: Option<PathBuf>,

        /// プロセス名（複数指定可）
        #[arg(short = 'p', long = "process")]
        process: Vec<String>,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "process-map.json")]
        output: PathBuf,

        /// 生成アダプタを使わず決定的パイプラインのみで生成
        #[arg(long)]
        no_ai: bool,

        /// 生成結果キャッシュを使用
        #[arg(long)]
        use_cache: bool,

        /// キャッシュ保存先（省略時はカレント）
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// プロセスマップJSONから各形式を出力
    Export {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (csv/json/html/svg/excel/all)
        #[arg(short, long, default_value = "all")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レポートタイトル
        #[arg(short, long, default_value = "Process Map")]
        title: String,
    },

    /// レイアウト計算結果をJSONで表示
    Layout {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 表示形式 (hierarchy/network/flow)
        #[arg(long, default_value = "hierarchy")]
        view: LayoutView,
    },

    /// 対話的にプロセスマップを編集
    Edit {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 業界ベンチマークを表示
    Catalog {
        /// 業界名を解決して表示
        #[arg(long)]
        resolve: Option<String>,

        /// カタログJSONファイル（省略時は組み込み）
        #[arg(long)]
        catalog_file: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Html,
    Svg,
    Excel,
    #[default]
    All,
}

impl ExportFormat {
    /// `All` を個別形式に展開
    pub fn expand(&self) -> Vec<ExportFormat> {
        match self {
            ExportFormat::All => vec![
                ExportFormat::Csv,
                ExportFormat::Json,
                ExportFormat::Html,
                ExportFormat::Svg,
                ExportFormat::Excel,
            ],
            other => vec![*other],
        }
    }

    /// 出力ファイルの拡張子
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Csv => Some("csv"),
            ExportFormat::Json => Some("json"),
            ExportFormat::Html => Some("html"),
            ExportFormat::Svg => Some("svg"),
            ExportFormat::Excel => Some("xlsx"),
            ExportFormat::All => None,
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "html" | "htm" => Ok(ExportFormat::Html),
            "svg" => Ok(ExportFormat::Svg),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!(
                "Unknown format: {}. Use csv, json, html, svg, excel, or all",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("htm".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_expand_all() {
        assert_eq!(ExportFormat::All.expand().len(), 5);
        assert_eq!(ExportFormat::Svg.expand(), vec![ExportFormat::Svg]);
        assert_eq!(ExportFormat::All.extension(), None);
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "process-map", "generate", "Manufacturing", "-p", "Welding", "-p", "Painting",
            "--provider", "none",
        ])
        .unwrap();
        assert_eq!(cli.provider, Some(AiProvider::Disabled));
        match cli.command {
            Commands::Generate { industry, process, output, .. } => {
                assert_eq!(industry, "Manufacturing");
                assert_eq!(process, vec!["Welding", "Painting"]);
                assert_eq!(output, PathBuf::from("process-map.json"));
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_parse_layout_view() {
        let cli = Cli::try_parse_from(["process-map", "layout", "map.json", "--view", "flow"]).unwrap();
        match cli.command {
            Commands::Layout { view, .. } => assert_eq!(view, LayoutView::Flow),
            _ => panic!("unexpected command"),
        }
    }
}
