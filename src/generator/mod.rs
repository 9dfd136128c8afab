//! 生成アダプタ
//!
//! 外部モデル（HTTP API またはローカルAI CLI）でプロセスマップ全体を生成する。
//! 呼び出しは1回のみ。失敗・タイムアウト・不正な応答はすべて
//! 決定的パイプライン（解決 → 合成 → 推論）へのフォールバックで吸収する。

pub mod cache;
pub mod command;
pub mod http;

pub use cache::{cache_key, ResponseCache};
pub use command::CommandGenerator;
pub use http::HttpGenerator;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::{ProcessMapError, Result};
use async_trait::async_trait;
use process_map_common::{
    build_deterministic_map, build_generation_prompt, normalize_payload, parse_generator_response,
    BenchmarkCatalog, IndustryBenchmark, ProcessMap,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 生成アダプタ
#[async_trait]
pub trait ProcessMapGenerator: Send + Sync {
    /// ログ表示用の名前
    fn name(&self) -> &str;

    /// プロンプトを送り、モデルの生テキストを返す
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// 生成リクエスト
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub industry: String,
    pub processes: Vec<String>,
    pub model: String,
    pub temperature: f32,
    pub prompt: String,
}

impl GenerationRequest {
    /// ベンチマークのヒントを含むプロンプトを組み立てる
    pub fn new(
        industry: impl Into<String>,
        processes: Vec<String>,
        model: impl Into<String>,
        benchmark: Option<&IndustryBenchmark>,
    ) -> Self {
        let industry = industry.into();
        let prompt = build_generation_prompt(&industry, &processes, benchmark);
        Self {
            industry,
            processes,
            model: model.into(),
            temperature: 0.2,
            prompt,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// マップの出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSource {
    Generated,
    Cached,
    Deterministic,
}

impl MapSource {
    pub fn label(&self) -> &'static str {
        match self {
            MapSource::Generated => "生成アダプタ",
            MapSource::Cached => "キャッシュ",
            MapSource::Deterministic => "ベンチマーク合成",
        }
    }
}

/// パイプラインの結果
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub map: ProcessMap,
    pub source: MapSource,
    /// 解決されたベンチマークの業界名
    pub benchmark_industry: Option<String>,
    /// フォールバックした理由（アダプタ失敗時のみ）
    pub fallback_reason: Option<String>,
}

/// 生成結果テキストを正規化済みマップへ変換
pub fn map_from_response(
    response: &str,
    benchmark: Option<&IndustryBenchmark>,
) -> Result<ProcessMap> {
    let payload = parse_generator_response(response)
        .map_err(|e| ProcessMapError::GeneratorParse(e.to_string()))?;
    normalize_payload(&payload, benchmark).map_err(|e| ProcessMapError::GeneratorParse(e.to_string()))
}

/// プロセスマップを構築（生成アダプタ → フォールバック）
///
/// # Arguments
/// * `catalog` - ベンチマークカタログ
/// * `request` - 業界名・プロセス一覧・プロンプト
/// * `generator` - 生成アダプタ（`None` ならキャッシュも見ずに決定的パイプラインのみ）
/// * `timeout` - アダプタ呼び出しの上限時間
/// * `cache` - 生成結果キャッシュ（`--use-cache` 時）
///
/// # Returns
/// 常にマップを返す。アダプタの失敗はエラーにしない。
pub async fn build_process_map(
    catalog: &BenchmarkCatalog,
    request: &GenerationRequest,
    generator: Option<&dyn ProcessMapGenerator>,
    timeout: Duration,
    mut cache: Option<&mut ResponseCache>,
) -> PipelineOutcome {
    let Some(generator) = generator else {
        debug!("no generator configured, using deterministic pipeline");
        return deterministic(catalog, request, None);
    };

    let benchmark = catalog.resolve(&request.industry);
    let benchmark_industry = benchmark.map(|b| b.industry.clone());
    let key = cache_key(generator.name(), &request.industry, &request.processes, &request.model);

    if let Some(cache) = cache.as_deref() {
        if let Some(response) = cache.get(&key) {
            match map_from_response(response, benchmark) {
                Ok(map) => {
                    info!("cache hit for {}", request.industry);
                    return PipelineOutcome {
                        map,
                        source: MapSource::Cached,
                        benchmark_industry,
                        fallback_reason: None,
                    };
                }
                Err(e) => warn!("cached response ignored: {}", e),
            }
        }
    }

    debug!("calling generator {} (timeout {:?})", generator.name(), timeout);
    let attempt = match tokio::time::timeout(timeout, generator.generate(request)).await {
        Ok(result) => result,
        Err(_) => Err(ProcessMapError::GeneratorTimeout(timeout.as_secs())),
    };

    let result = attempt.and_then(|response| {
        let map = map_from_response(&response, benchmark)?;
        Ok((map, response))
    });

    match result {
        Ok((map, response)) => {
            if let Some(cache) = cache.as_deref_mut() {
                cache.insert(key, &request.industry, &request.model, response);
            }
            PipelineOutcome {
                map,
                source: MapSource::Generated,
                benchmark_industry,
                fallback_reason: None,
            }
        }
        Err(e) => {
            warn!("generator {} failed, falling back: {}", generator.name(), e);
            deterministic(catalog, request, Some(e.to_string()))
        }
    }
}

fn deterministic(
    catalog: &BenchmarkCatalog,
    request: &GenerationRequest,
    fallback_reason: Option<String>,
) -> PipelineOutcome {
    let (map, benchmark) = build_deterministic_map(catalog, &request.industry, &request.processes);
    PipelineOutcome {
        map,
        source: MapSource::Deterministic,
        benchmark_industry: benchmark.map(|b| b.industry.clone()),
        fallback_reason,
    }
}

/// 設定とプロバイダから生成アダプタを作る
///
/// # Returns
/// * `Ok(None)` - プロバイダが `none`
/// * `Err(MissingApiKey)` - HTTP でAPIキー未設定
pub fn from_config(
    config: &Config,
    provider: AiProvider,
) -> Result<Option<Box<dyn ProcessMapGenerator>>> {
    match provider {
        AiProvider::Disabled => Ok(None),
        AiProvider::Http => {
            let api_key = config.get_api_key()?;
            let generator = HttpGenerator::new(&config.api_base_url, api_key)?;
            Ok(Some(Box::new(generator)))
        }
        AiProvider::Claude | AiProvider::Codex | AiProvider::Gemini => {
            Ok(CommandGenerator::for_provider(provider)
                .map(|g| Box::new(g) as Box<dyn ProcessMapGenerator>))
        }
    }
}
