//! Process Map Common Library
//!
//! プロセスマップ合成・レイアウトエンジン（CLIから利用される純粋ロジック）
//!
//! ## パイプライン
//! 1. resolver: 業界名 → ベンチマーク
//! 2. synthesizer: ユーザー入力 + ベンチマーク → プロセス一覧
//! 3. inferencer: プロセス一覧 → 関係
//! 4. layout: 階層 / ネットワーク / フロー図

pub mod catalog;
pub mod error;
pub mod export;
pub mod generator;
pub mod inferencer;
pub mod layout;
pub mod parser;
pub mod prompts;
pub mod resolver;
pub mod session;
pub mod synthesizer;
pub mod types;

pub use catalog::{BenchmarkCatalog, IndustryBenchmark, InteractionTemplate};
pub use error::{Error, Result};
pub use generator::{normalize_payload, GeneratorPayload};
pub use inferencer::{derive_process_flow, infer, infer_with, InferenceOptions};
pub use layout::{flow_layout, hierarchy_layout, layout_json, network_layout, LayoutView};
pub use parser::{extract_json, parse_generator_response};
pub use prompts::build_generation_prompt;
pub use resolver::resolve;
pub use session::{GenerationTicket, Session, SessionState};
pub use synthesizer::{parse_process_list, synthesize};
pub use types::{Interaction, Process, ProcessCategory, ProcessDraft, ProcessFlow, ProcessMap};

/// 決定的パイプライン（解決 → 合成 → 推論）
///
/// 生成アダプタが使えない場合のフォールバックとしても使う。
///
/// # Returns
/// `(マップ, 解決されたベンチマーク)`
pub fn build_deterministic_map<'a>(
    catalog: &'a BenchmarkCatalog,
    industry: &str,
    user_processes: &[String],
) -> (ProcessMap, Option<&'a IndustryBenchmark>) {
    let benchmark = catalog.resolve(industry);
    let processes = synthesize(user_processes, benchmark);
    let interactions = infer(&processes);
    let mut map = ProcessMap::new(processes, interactions);
    map.process_flow = Some(derive_process_flow(&map));
    (map, benchmark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_deterministic_map() {
        let catalog = BenchmarkCatalog::builtin();
        let (map, benchmark) = build_deterministic_map(catalog, "  MANUFACTURING ", &[]);
        assert_eq!(benchmark.map(|b| b.industry.as_str()), Some("Manufacturing"));
        assert_eq!(map.len(), 10);
        assert_eq!(map.interactions.len(), 4);
        assert_eq!(map.process_flow.as_ref().unwrap().primary_flow.len(), 5);
    }

    #[test]
    fn test_lowercase_user_support_process_is_not_chained() {
        let user = vec!["human resources".to_string()];
        let (map, _) = build_deterministic_map(BenchmarkCatalog::builtin(), "Manufacturing", &user);
        let hr = map.find_by_name("human resources").unwrap();
        assert_eq!(hr.category, ProcessCategory::Support);
        assert!(map.interactions.iter().all(|i| !i.touches("human resources")));
    }

    #[test]
    fn test_build_deterministic_map_nothing() {
        let (map, benchmark) = build_deterministic_map(BenchmarkCatalog::builtin(), "", &[]);
        assert!(benchmark.is_none());
        assert!(map.is_empty());
        assert!(map.interactions.is_empty());
    }
}
