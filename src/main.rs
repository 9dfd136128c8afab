use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use process_map_common::export::{map_from_json, map_to_json};
use process_map_common::{
    layout_json, parse_process_list, BenchmarkCatalog, IndustryBenchmark, ProcessCategory, Session,
};
use process_map_rust::{ai_provider, cli, config, editor, export, generator, logging};
use ai_provider::AiProvider;
use cli::{Cli, Commands};
use config::Config;
use generator::{GenerationRequest, MapSource, ResponseCache};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Generate { industry, processes_file, process, output, no_ai, use_cache, cache_dir } => {
            println!("🗺  process-map - プロセスマップ生成\n");

            // 入力プロセス一覧
            let mut processes: Vec<String> = process
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if let Some(path) = &processes_file {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("プロセス一覧を読み込めません: {}", path.display()))?;
                processes.extend(parse_process_list(&text));
            }

            let mut session = Session::new();
            session.set_input(industry, processes)?;
            let ticket = session.begin_generation()?;

            // 1. ベンチマーク解決
            println!("[1/3] 業界ベンチマークを解決中...");
            let catalog = BenchmarkCatalog::builtin();
            let benchmark = catalog.resolve(&ticket.industry);
            match benchmark {
                Some(b) => println!("✔ ベンチマーク: {}\n", b.industry),
                None => println!("✔ 該当する業界ベンチマークなし（入力プロセスのみ使用）\n"),
            }

            // 2. 生成
            let provider = if no_ai {
                AiProvider::Disabled
            } else {
                cli.provider.unwrap_or(config.provider)
            };
            let adapter = match generator::from_config(&config, provider) {
                Ok(g) => g,
                Err(e) => {
                    warn!("generator unavailable: {}", e);
                    None
                }
            };

            let cache_folder = cache_dir.unwrap_or_else(|| PathBuf::from("."));
            let mut cache = (adapter.is_some() && (use_cache || config.cache_enabled))
                .then(|| ResponseCache::load(&cache_folder));

            println!(
                "[2/3] プロセスマップを生成中... (アダプタ: {}){}",
                adapter.as_ref().map_or("none", |g| g.name()),
                if cache.is_some() { " (キャッシュ有効)" } else { "" }
            );
            let request = GenerationRequest::new(
                ticket.industry.clone(),
                ticket.processes.clone(),
                config.model.clone(),
                benchmark,
            )
            .with_temperature(config.temperature);

            let spinner = ProgressBar::new_spinner();
            spinner.set_message("生成中...");
            spinner.enable_steady_tick(Duration::from_millis(120));
            let outcome = generator::build_process_map(
                catalog,
                &request,
                adapter.as_deref(),
                Duration::from_secs(config.timeout_seconds),
                cache.as_mut(),
            )
            .await;
            spinner.finish_and_clear();

            if let Some(reason) = &outcome.fallback_reason {
                debug!("fallback reason: {}", reason);
                println!("  生成アダプタを使用できないため、ベンチマーク合成に切り替えました");
            }
            if let Some(cache) = &cache {
                if outcome.source == MapSource::Generated {
                    cache.save(&cache_folder)?;
                }
            }
            println!("✔ 生成元: {}\n", outcome.source.label());

            if !session.complete_generation(ticket, outcome.map, outcome.benchmark_industry)? {
                anyhow::bail!("生成結果が古いため破棄されました");
            }

            // 3. 保存
            println!("[3/3] 結果を保存中...");
            session.start_editing()?;
            session.submit()?;
            let results = session.release()?;
            let map = &results.session_map.map;
            if map.is_empty() {
                println!("  ⚠ プロセスが0件です。業界名またはプロセスを指定してください");
            }
            std::fs::write(&output, map_to_json(map)?)?;
            println!("✔ 結果を保存: {}", output.display());
            print_summary(map);

            println!("\n✅ 生成完了");
        }

        Commands::Export { input, format, output, title } => {
            println!("📄 process-map - エクスポート\n");

            let map = load_map(&input)?;
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let written = export::export_map(&map, format, &output_dir, &title)?;
            debug!("{} files written", written.len());

            println!("\n✅ エクスポート完了");
        }

        Commands::Layout { input, view } => {
            let map = load_map(&input)?;
            println!("{}", layout_json(&map, view)?);
        }

        Commands::Edit { input, output } => {
            println!("✏️  process-map - 対話編集\n");
            editor::run_interactive_editor(&input, output.as_deref())?;
        }

        Commands::Catalog { resolve, catalog_file } => {
            let custom;
            let catalog = match &catalog_file {
                Some(path) => {
                    custom = BenchmarkCatalog::from_file(path)
                        .with_context(|| format!("カタログを読み込めません: {}", path.display()))?;
                    &custom
                }
                None => BenchmarkCatalog::builtin(),
            };

            match resolve {
                Some(text) => match catalog.resolve(&text) {
                    Some(benchmark) => print_benchmark(benchmark),
                    None => println!("該当する業界ベンチマークがありません: {}", text),
                },
                None => {
                    println!("業界ベンチマーク ({}件):", catalog.len());
                    for b in catalog.industries() {
                        println!(
                            "  - {} (主要 {} / 支援 {} / 管理 {})",
                            b.industry,
                            b.core_processes.len(),
                            b.support_processes.len(),
                            b.management_processes.len()
                        );
                    }
                }
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  プロバイダ: {}", config.provider);
                println!("  APIエンドポイント: {}", config.api_base_url);
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  temperature: {}", config.temperature);
                println!("  キャッシュ: {}", if config.cache_enabled { "有効" } else { "無効" });
                println!("  APIキー: {}", config.masked_api_key());
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = ResponseCache::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = ResponseCache::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match ResponseCache::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn load_map(path: &Path) -> anyhow::Result<process_map_common::ProcessMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("ファイルが見つかりません: {}", path.display()))?;
    Ok(map_from_json(&content)?)
}

fn print_summary(map: &process_map_common::ProcessMap) {
    for category in ProcessCategory::DISPLAY_ORDER {
        println!("  {}: {}件", category.label(), map.by_category(category).count());
    }
    println!("  Interactions: {}件", map.interactions.len());
}

fn print_benchmark(benchmark: &IndustryBenchmark) {
    println!("業界: {}", benchmark.industry);
    println!("  主要: {}", benchmark.core_processes.join(", "));
    println!("  支援: {}", benchmark.support_processes.join(", "));
    println!("  管理: {}", benchmark.management_processes.join(", "));
    println!("  リスク: {}", benchmark.risks.join(", "));
    println!("  KPI: {}", benchmark.kpis.join(", "));
}
