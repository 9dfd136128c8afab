//! プロンプト生成モジュール
//!
//! CLIの生成アダプタ（HTTP/ローカルCLI）で共有されるプロンプト生成ロジック:
//! - CATEGORY_NAMES: 区分の定数
//! - build_generation_prompt: プロセスマップ生成用プロンプト

use crate::catalog::IndustryBenchmark;
use crate::generator::MAX_LIST_ITEMS;

/// 区分（出力JSONで許可される値）
pub const CATEGORY_NAMES: &[&str] = &["core", "support", "management"];

/// プロセスマップ生成プロンプト
///
/// # Arguments
/// * `industry` - ユーザー入力の業界名
/// * `user_processes` - ユーザー入力のプロセス名（順序保持）
/// * `benchmark` - 解決済みのベンチマーク（ヒントとして埋め込む）
///
/// # Returns
/// 生成用のプロンプト文字列
pub fn build_generation_prompt(
    industry: &str,
    user_processes: &[String],
    benchmark: Option<&IndustryBenchmark>,
) -> String {
    let process_list = if user_processes.is_empty() {
        "(none provided)".to_string()
    } else {
        user_processes
            .iter()
            .map(|name| format!("- {}", name))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let benchmark_hint = benchmark
        .map(|b| {
            format!(
                r#"
## Reference benchmark: {label}
- Core: {core}
- Support: {support}
- Management: {management}
- Typical risks: {risks}
- Typical KPIs: {kpis}
"#,
                label = b.industry,
                core = b.core_processes.join(", "),
                support = b.support_processes.join(", "),
                management = b.management_processes.join(", "),
                risks = b.risks.join(", "),
                kpis = b.kpis.join(", "),
            )
        })
        .unwrap_or_default();

    let categories = CATEGORY_NAMES.join(", ");

    format!(
        r#"You are an ISO 9001 quality management consultant. Build a process map for an organization in the "{industry}" industry.

## User-supplied processes (keep their wording and order)
{process_list}
{benchmark_hint}
## Rules
- Each process has exactly one category: {categories}
- Include every user-supplied process; add missing core, support and management processes
- At most {max_items} inputs and {max_items} outputs per process
- Interactions are directed; "from" and "to" must be process names from the list
- Do not repeat a process name

## Output format (strictly this JSON object)
{{
  "processes": [
    {{
      "name": "Process name",
      "category": "core",
      "inputs": ["Input"],
      "outputs": ["Output"],
      "risk": "Main risk",
      "kpi": "Key performance indicator",
      "owner": "Responsible role",
      "isoClauses": ["8.1"]
    }}
  ],
  "interactions": [
    {{"from": "Process name", "to": "Process name", "description": "What flows"}}
  ],
  "processFlow": {{
    "primaryFlow": ["Process name"],
    "supportingFlows": [{{"name": "Group name", "processes": ["Process name"]}}],
    "feedbackLoops": [{{"from": "Process name", "to": "Process name", "description": "Why"}}]
  }}
}}

Output the JSON object only. No explanations."#,
        max_items = MAX_LIST_ITEMS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BenchmarkCatalog;

    #[test]
    fn test_category_names() {
        assert_eq!(CATEGORY_NAMES.len(), 3);
        assert!(CATEGORY_NAMES.contains(&"core"));
    }

    #[test]
    fn test_prompt_contains_industry_and_processes() {
        let user = vec!["Quoting".to_string(), "Assembly".to_string()];
        let prompt = build_generation_prompt("Bicycle maker", &user, None);
        assert!(prompt.contains("\"Bicycle maker\""));
        assert!(prompt.contains("- Quoting\n- Assembly"));
        assert!(!prompt.contains("Reference benchmark"));
        assert!(prompt.contains("\"isoClauses\""));
    }

    #[test]
    fn test_prompt_embeds_benchmark_hint() {
        let b = BenchmarkCatalog::builtin().get("Manufacturing").unwrap();
        let prompt = build_generation_prompt("manufacturing", &[], Some(b));
        assert!(prompt.contains("(none provided)"));
        assert!(prompt.contains("Reference benchmark: Manufacturing"));
        assert!(prompt.contains("Quality Control"));
    }

    #[test]
    fn test_prompt_json_braces_are_literal() {
        let prompt = build_generation_prompt("x", &[], None);
        assert!(prompt.contains("\"processes\": ["));
        assert!(!prompt.contains("{{"));
    }
}
