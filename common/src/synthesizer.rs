//! プロセス合成
//!
//! ユーザー入力のプロセス名とベンチマークのプロセス名を統合し、
//! 区分・属性・IDを持つプロセス一覧を生成する。
//!
//! ## 処理フロー
//! 1. ユーザー入力（trim、空行除去、順序保持）
//! 2. ベンチマーク主要プロセスのうち「未カバー」のものを追加
//! 3. 支援プロセス最大3件・管理プロセス最大2件を無条件に追加
//! 4. 同名（大文字小文字無視）の重複を除去し、1始まりの連番IDを付与
//! 5. 区分・属性を設定

use crate::catalog::IndustryBenchmark;
use crate::types::{Process, ProcessCategory, DEFAULT_KPI, DEFAULT_RISK};
use std::collections::HashSet;
use tracing::debug;

/// 支援プロセスの追加上限
pub const MAX_SUPPORT_SUGGESTIONS: usize = 3;

/// 管理プロセスの追加上限
pub const MAX_MANAGEMENT_SUGGESTIONS: usize = 2;

/// フォーム入力（改行区切り）をプロセス名リストに変換
pub fn parse_process_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// ベンチマークのプロセス名がユーザー入力でカバー済みか
///
/// ユーザー文字列（小文字）のいずれかが、ベンチマーク名の先頭トークン（小文字）を含めばカバー済み。
/// 意図的に緩い判定であり、厳密化しない。
pub fn is_covered(benchmark_name: &str, user_names: &[String]) -> bool {
    let first_token = match benchmark_name.split_whitespace().next() {
        Some(token) => token.to_lowercase(),
        None => return false,
    };
    user_names
        .iter()
        .any(|u| u.to_lowercase().contains(&first_token))
}

/// ベンチマークの所属から区分を決める（該当なしは主要）
pub fn categorize(name: &str, benchmark: Option<&IndustryBenchmark>) -> ProcessCategory {
    match benchmark {
        Some(b) if b.is_core(name) => ProcessCategory::Core,
        Some(b) if b.is_support(name) => ProcessCategory::Support,
        Some(b) if b.is_management(name) => ProcessCategory::Management,
        _ => ProcessCategory::Core,
    }
}

/// インデックスでリストを巡回して取得（空ならフォールバック）
pub(crate) fn cycle<'a>(items: Option<&'a [String]>, index: usize, fallback: &'a str) -> &'a str {
    match items {
        Some(list) if !list.is_empty() => list[index % list.len()].as_str(),
        _ => fallback,
    }
}

/// 合成対象のプロセス名一覧（区分決定・属性付与の前段）
pub fn merge_names(user_names: &[String], benchmark: Option<&IndustryBenchmark>) -> Vec<String> {
    let user: Vec<String> = user_names
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let mut names = user.clone();

    if let Some(b) = benchmark {
        for core in &b.core_processes {
            if is_covered(core, &user) {
                debug!(process = %core, "benchmark core process already covered by user input");
            } else {
                names.push(core.clone());
            }
        }
        names.extend(b.support_processes.iter().take(MAX_SUPPORT_SUGGESTIONS).cloned());
        names.extend(b.management_processes.iter().take(MAX_MANAGEMENT_SUGGESTIONS).cloned());
    }

    // 完全一致（大文字小文字無視）の重複は先勝ち
    let mut seen = HashSet::new();
    names.retain(|n| seen.insert(n.to_lowercase()));
    names
}

/// ユーザー入力とベンチマークからプロセス一覧を合成
///
/// # Arguments
/// * `user_names` - ユーザーが入力したプロセス名（順序保持）
/// * `benchmark` - 解決済みのベンチマーク（無ければ `None`）
///
/// # Returns
/// 区分・属性・IDが確定したプロセス一覧。入力もベンチマークも無ければ空。
pub fn synthesize(user_names: &[String], benchmark: Option<&IndustryBenchmark>) -> Vec<Process> {
    let names = merge_names(user_names, benchmark);
    let risks = benchmark.map(|b| b.risks.as_slice());
    let kpis = benchmark.map(|b| b.kpis.as_slice());

    let processes: Vec<Process> = names
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let category = categorize(&name, benchmark);
            let mut process = Process::new((index + 1).to_string(), name, category);
            process.risk = cycle(risks, index, DEFAULT_RISK).to_string();
            process.kpi = cycle(kpis, index, DEFAULT_KPI).to_string();
            process
        })
        .collect();

    debug!(
        count = processes.len(),
        industry = benchmark.map(|b| b.industry.as_str()).unwrap_or("-"),
        "processes synthesized"
    );
    processes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BenchmarkCatalog;

    fn manufacturing() -> &'static IndustryBenchmark {
        BenchmarkCatalog::builtin().get("Manufacturing").unwrap()
    }

    fn names(processes: &[Process]) -> Vec<&str> {
        processes.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_parse_process_list() {
        let text = "  Sales  \n\n\tProduction\r\n   \nShipping";
        assert_eq!(parse_process_list(text), vec!["Sales", "Production", "Shipping"]);
        assert!(parse_process_list("").is_empty());
    }

    #[test]
    fn test_synthesize_empty_everything() {
        assert!(synthesize(&[], None).is_empty());
    }

    #[test]
    fn test_synthesize_empty_user_list() {
        let b = manufacturing();
        let result = synthesize(&[], Some(b));

        let mut expected: Vec<&str> = b.core_processes.iter().map(String::as_str).collect();
        expected.extend(b.support_processes.iter().take(3).map(String::as_str));
        expected.extend(b.management_processes.iter().take(2).map(String::as_str));
        assert_eq!(names(&result), expected);

        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
    }

    #[test]
    fn test_synthesize_does_not_duplicate_covered_core() {
        let user = vec!["Order Fulfillment & Shipping".to_string()];
        let result = synthesize(&user, Some(manufacturing()));
        let count = result
            .iter()
            .filter(|p| p.name == "Order Fulfillment & Shipping")
            .count();
        assert_eq!(count, 1);
        assert_eq!(result[0].name, "Order Fulfillment & Shipping");
        assert_eq!(result[0].category, ProcessCategory::Core);
    }

    #[test]
    fn test_first_token_rule_is_loose() {
        // "Quality" を含むだけで "Quality Control" はカバー済み扱い
        assert!(is_covered("Quality Control", &["Supplier quality audits".to_string()]));
        // 先頭トークン以外の一致は無視
        assert!(!is_covered("Quality Control", &["Control room".to_string()]));
        // 部分文字列でも一致する（"reorder" は "order" を含む）
        assert!(is_covered("Order Intake", &["Reorder point review".to_string()]));
        assert!(!is_covered("", &["anything".to_string()]));
    }

    #[test]
    fn test_user_input_trimmed_and_blank_removed() {
        let user = vec!["  Sales  ".to_string(), "".to_string(), "   ".to_string()];
        let result = synthesize(&user, None);
        assert_eq!(names(&result), vec!["Sales"]);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn test_categories_from_benchmark_membership() {
        let user = vec![
            "Human Resources".to_string(),
            "Strategic Planning".to_string(),
            "Custom Widget Painting".to_string(),
        ];
        let result = synthesize(&user, Some(manufacturing()));
        let hr = result.iter().find(|p| p.name == "Human Resources").unwrap();
        let sp = result.iter().find(|p| p.name == "Strategic Planning").unwrap();
        let custom = result.iter().find(|p| p.name == "Custom Widget Painting").unwrap();
        assert_eq!(hr.category, ProcessCategory::Support);
        assert_eq!(sp.category, ProcessCategory::Management);
        assert_eq!(custom.category, ProcessCategory::Core);
    }

    #[test]
    fn test_exact_duplicates_are_collapsed() {
        // ユーザー入力とベンチマーク支援プロセスが同名 → 1件に統合
        let user = vec!["human resources".to_string(), "Sales".to_string(), "SALES".to_string()];
        let result = synthesize(&user, Some(manufacturing()));
        let lowered: Vec<String> = result.iter().map(|p| p.name.to_lowercase()).collect();
        assert_eq!(lowered.iter().filter(|n| *n == "human resources").count(), 1);
        assert_eq!(lowered.iter().filter(|n| *n == "sales").count(), 1);
        // 統合後もベンチマーク上の区分を保つ
        let hr = result.iter().find(|p| p.name == "human resources").unwrap();
        assert_eq!(hr.category, ProcessCategory::Support);
        // IDは欠番なしの連番
        for (i, p) in result.iter().enumerate() {
            assert_eq!(p.id, (i + 1).to_string());
        }
    }

    #[test]
    fn test_risk_and_kpi_cycle() {
        let b = manufacturing();
        let result = synthesize(&[], Some(b));
        assert_eq!(result[0].risk, b.risks[0]);
        assert_eq!(result[0].kpi, b.kpis[0]);
        let n = b.risks.len();
        assert_eq!(result[n].risk, b.risks[0]);
        assert_eq!(result[n + 1].risk, b.risks[1]);
    }

    #[test]
    fn test_defaults_without_benchmark() {
        let result = synthesize(&["Invoicing".to_string()], None);
        let p = &result[0];
        assert_eq!(p.category, ProcessCategory::Core);
        assert_eq!(p.risk, DEFAULT_RISK);
        assert_eq!(p.kpi, DEFAULT_KPI);
        assert_eq!(p.owner, "Invoicing Manager");
        assert_eq!(p.inputs[0], "Invoicing inputs");
        assert_eq!(p.outputs[0], "Invoicing outputs");
        assert_eq!(p.iso_clauses, vec!["8.1", "8.2", "9.1"]);
    }

    #[test]
    fn test_empty_risk_list_falls_back() {
        let catalog = BenchmarkCatalog::from_json(
            r#"[{"industry": "Bare", "coreProcesses": ["Make Things"], "kpis": ["Units made"]}]"#,
        )
        .unwrap();
        let result = synthesize(&[], catalog.get("Bare"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].risk, DEFAULT_RISK);
        assert_eq!(result[0].kpi, "Units made");
    }
}
