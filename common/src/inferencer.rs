//! プロセス間の関係の推論
//!
//! 明示的な関係データ（生成結果など）が無い場合に使用する。
//! 既定ルールは「隣接する主要プロセス同士を順に連結」のみ。
//! 支援・管理プロセスの扱いは `InferenceOptions` で明示的に有効化した場合に限る。

use crate::catalog::IndustryBenchmark;
use crate::types::{
    FeedbackLoop, Interaction, Process, ProcessCategory, ProcessFlow, ProcessMap, SupportingFlow,
    DEFAULT_INTERACTION_DESCRIPTION,
};
use std::collections::{HashMap, HashSet};

/// 支援フローのグループ名
pub const SUPPORT_FLOW_NAME: &str = "Support Services";

/// 管理フローのグループ名
pub const MANAGEMENT_FLOW_NAME: &str = "Management Oversight";

/// 追加の推論ルール（既定はすべて無効）
#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceOptions {
    /// ベンチマークの標準関係のうち、両端が存在するものを採用
    pub benchmark_templates: bool,
    /// 各支援プロセス → 先頭の主要プロセス
    pub support_fan_out: bool,
    /// 各管理プロセス → 各主要プロセス
    pub management_oversight: bool,
}

/// 既定ルールで関係を推論
///
/// 入力順で隣接するペアの両方が主要プロセスの場合のみ連結する。
/// 間に他区分が挟まれば連結しない。
pub fn infer(processes: &[Process]) -> Vec<Interaction> {
    processes
        .windows(2)
        .filter(|pair| {
            pair[0].category == ProcessCategory::Core && pair[1].category == ProcessCategory::Core
        })
        .map(|pair| {
            Interaction::new(
                pair[0].name.clone(),
                pair[1].name.clone(),
                Some(DEFAULT_INTERACTION_DESCRIPTION.to_string()),
            )
        })
        .collect()
}

/// 既定ルール + 追加ルールで関係を推論
pub fn infer_with(
    processes: &[Process],
    benchmark: Option<&IndustryBenchmark>,
    options: &InferenceOptions,
) -> Vec<Interaction> {
    let mut interactions = infer(processes);
    let mut seen: HashSet<(String, String)> = interactions
        .iter()
        .map(|i| (i.from.clone(), i.to.clone()))
        .collect();
    let mut push = |interaction: Interaction, out: &mut Vec<Interaction>| {
        if seen.insert((interaction.from.clone(), interaction.to.clone())) {
            out.push(interaction);
        }
    };

    let names: HashSet<&str> = processes.iter().map(|p| p.name.as_str()).collect();
    let core: Vec<&Process> = processes
        .iter()
        .filter(|p| p.category == ProcessCategory::Core)
        .collect();

    if options.benchmark_templates {
        if let Some(b) = benchmark {
            for t in &b.interactions {
                if names.contains(t.from.as_str()) && names.contains(t.to.as_str()) {
                    let description = (!t.description.is_empty()).then(|| t.description.clone());
                    push(Interaction::new(t.from.clone(), t.to.clone(), description), &mut interactions);
                }
            }
        }
    }

    if options.support_fan_out {
        if let Some(first_core) = core.first() {
            for p in processes.iter().filter(|p| p.category == ProcessCategory::Support) {
                push(
                    Interaction::new(p.name.clone(), first_core.name.clone(), Some("Provides support".into())),
                    &mut interactions,
                );
            }
        }
    }

    if options.management_oversight {
        for m in processes.iter().filter(|p| p.category == ProcessCategory::Management) {
            for c in &core {
                push(
                    Interaction::new(m.name.clone(), c.name.clone(), Some("Oversight and direction".into())),
                    &mut interactions,
                );
            }
        }
    }

    interactions
}

/// プロセスマップから上位フローの要約を導出
///
/// - 主要フロー: 主要プロセス名（入力順）
/// - 支援フロー: 支援・管理プロセスの名前付きグループ（空のグループは出さない）
/// - フィードバック: 主要フロー上で後ろから前へ戻る関係
pub fn derive_process_flow(map: &ProcessMap) -> ProcessFlow {
    let primary_flow: Vec<String> = map
        .by_category(ProcessCategory::Core)
        .map(|p| p.name.clone())
        .collect();

    let mut supporting_flows = Vec::new();
    for (name, category) in [
        (SUPPORT_FLOW_NAME, ProcessCategory::Support),
        (MANAGEMENT_FLOW_NAME, ProcessCategory::Management),
    ] {
        let processes: Vec<String> = map.by_category(category).map(|p| p.name.clone()).collect();
        if !processes.is_empty() {
            supporting_flows.push(SupportingFlow {
                name: name.to_string(),
                processes,
            });
        }
    }

    let position: HashMap<&str, usize> = primary_flow
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    let feedback_loops = map
        .interactions
        .iter()
        .filter(|i| match (position.get(i.from.as_str()), position.get(i.to.as_str())) {
            (Some(from), Some(to)) => to < from,
            _ => false,
        })
        .map(|i| FeedbackLoop {
            from: i.from.clone(),
            to: i.to.clone(),
            description: i.description.clone(),
        })
        .collect();

    ProcessFlow {
        primary_flow,
        supporting_flows,
        feedback_loops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BenchmarkCatalog;
    use crate::synthesizer::synthesize;

    fn p(id: &str, name: &str, category: ProcessCategory) -> Process {
        Process::new(id, name, category)
    }

    #[test]
    fn test_infer_chains_adjacent_core() {
        let processes = vec![
            p("1", "A", ProcessCategory::Core),
            p("2", "B", ProcessCategory::Core),
            p("3", "C", ProcessCategory::Core),
        ];
        let result = infer(&processes);
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].from.as_str(), result[0].to.as_str()), ("A", "B"));
        assert_eq!((result[1].from.as_str(), result[1].to.as_str()), ("B", "C"));
        assert_eq!(result[0].description.as_deref(), Some(DEFAULT_INTERACTION_DESCRIPTION));
    }

    #[test]
    fn test_infer_broken_adjacency() {
        let processes = vec![
            p("1", "A", ProcessCategory::Core),
            p("2", "B", ProcessCategory::Support),
            p("3", "C", ProcessCategory::Core),
        ];
        assert!(infer(&processes).is_empty());
    }

    #[test]
    fn test_infer_empty_and_single() {
        assert!(infer(&[]).is_empty());
        assert!(infer(&[p("1", "A", ProcessCategory::Core)]).is_empty());
    }

    #[test]
    fn test_infer_leaves_support_and_management_unconnected() {
        let b = BenchmarkCatalog::builtin().get("Manufacturing").unwrap();
        let processes = synthesize(&[], Some(b));
        let result = infer(&processes);
        // 主要5件 → 4本の連結のみ
        assert_eq!(result.len(), 4);
        for i in &result {
            assert!(b.is_core(&i.from) && b.is_core(&i.to));
        }
    }

    #[test]
    fn test_infer_with_defaults_matches_infer() {
        let b = BenchmarkCatalog::builtin().get("Consulting").unwrap();
        let processes = synthesize(&[], Some(b));
        assert_eq!(
            infer_with(&processes, Some(b), &InferenceOptions::default()),
            infer(&processes)
        );
    }

    #[test]
    fn test_infer_with_benchmark_templates_skips_missing_and_duplicates() {
        let b = BenchmarkCatalog::builtin().get("Manufacturing").unwrap();
        let processes = synthesize(&[], Some(b));
        let options = InferenceOptions {
            benchmark_templates: true,
            ..Default::default()
        };
        let result = infer_with(&processes, Some(b), &options);
        // 既定の4本 + 重複しないテンプレート（QC → Manufacturing Ops, Maintenance → Manufacturing Ops）
        assert_eq!(result.len(), 6);
        let pairs: HashSet<(&str, &str)> = result
            .iter()
            .map(|i| (i.from.as_str(), i.to.as_str()))
            .collect();
        assert_eq!(pairs.len(), result.len());
        assert!(pairs.contains(&("Quality Control", "Manufacturing Operations")));
    }

    #[test]
    fn test_infer_with_fan_out() {
        let processes = vec![
            p("1", "Plan", ProcessCategory::Management),
            p("2", "Make", ProcessCategory::Core),
            p("3", "Ship", ProcessCategory::Core),
            p("4", "HR", ProcessCategory::Support),
        ];
        let options = InferenceOptions {
            support_fan_out: true,
            management_oversight: true,
            ..Default::default()
        };
        let result = infer_with(&processes, None, &options);
        let pairs: Vec<(&str, &str)> = result
            .iter()
            .map(|i| (i.from.as_str(), i.to.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("Make", "Ship"), ("HR", "Make"), ("Plan", "Make"), ("Plan", "Ship")]
        );
    }

    #[test]
    fn test_derive_process_flow() {
        let processes = vec![
            p("1", "Plan", ProcessCategory::Management),
            p("2", "Make", ProcessCategory::Core),
            p("3", "Check", ProcessCategory::Core),
            p("4", "HR", ProcessCategory::Support),
        ];
        let mut interactions = infer(&processes);
        interactions.push(Interaction::new("Check", "Make", Some("Rework".into())));
        interactions.push(Interaction::new("Check", "Ghost", None));
        let map = ProcessMap::new(processes, interactions);

        let flow = derive_process_flow(&map);
        assert_eq!(flow.primary_flow, vec!["Make", "Check"]);
        assert_eq!(flow.supporting_flows.len(), 2);
        assert_eq!(flow.supporting_flows[0].name, SUPPORT_FLOW_NAME);
        assert_eq!(flow.supporting_flows[0].processes, vec!["HR"]);
        assert_eq!(flow.supporting_flows[1].processes, vec!["Plan"]);
        assert_eq!(flow.feedback_loops.len(), 1);
        assert_eq!(flow.feedback_loops[0].to, "Make");
    }

    #[test]
    fn test_derive_process_flow_empty() {
        let flow = derive_process_flow(&ProcessMap::default());
        assert!(flow.primary_flow.is_empty());
        assert!(flow.supporting_flows.is_empty());
        assert!(flow.feedback_loops.is_empty());
    }
}
