//! OpenAI互換APIへの実接続テスト（APIキー未設定時はスキップ）

use process_map_common::BenchmarkCatalog;
use process_map_rust::config::{Config, ENV_API_KEY, ENV_OPENAI_API_KEY};
use process_map_rust::generator::{
    build_process_map, GenerationRequest, HttpGenerator, MapSource, ProcessMapGenerator,
};
use std::time::Duration;

#[tokio::test]
async fn http_generator_integration() {
    let has_key = [ENV_API_KEY, ENV_OPENAI_API_KEY]
        .iter()
        .any(|k| matches!(std::env::var(k), Ok(v) if !v.trim().is_empty()));
    if !has_key {
        eprintln!("PROCESS_MAP_API_KEY / OPENAI_API_KEY not set; skipping integration test");
        return;
    }

    let mut config = Config::default();
    config.apply_overrides(|k| std::env::var(k).ok());
    let api_key = config.get_api_key().expect("api key missing");

    let generator = HttpGenerator::new(&config.api_base_url, api_key).expect("client build failed");
    let catalog = BenchmarkCatalog::builtin();
    let request = GenerationRequest::new(
        "Logistics",
        vec!["Cross-docking".to_string()],
        config.model.clone(),
        catalog.resolve("Logistics"),
    );

    let raw = generator.generate(&request).await.expect("request failed");
    assert!(raw.contains('{'), "response has no JSON: {}", raw);

    let outcome = build_process_map(
        catalog,
        &request,
        Some(&generator),
        Duration::from_secs(config.timeout_seconds),
        None,
    )
    .await;
    assert_eq!(outcome.source, MapSource::Generated, "{:?}", outcome.fallback_reason);
    assert!(!outcome.map.is_empty());
}
