//! 生成結果（外部モデル出力）の検証・正規化
//!
//! 外部の言語モデルが返すJSONは信用しない。`GeneratorPayload` は未検証の入力型で、
//! 各フィールドは `serde_json::Value` のまま受け取り、`normalize_payload` で
//! 内部の `ProcessMap` に変換する。
//!
//! 正規化ルール:
//! - 区分: 大文字小文字を無視して解釈、不正・欠落は主要
//! - 名前: trim、空は除外、同名（大文字小文字無視）は先勝ち
//! - インプット/アウトプット: 最大4件、空要素除外、欠落は空
//! - リスク/KPI/オーナー: 欠落は合成時と同じ既定値
//! - ISO条項: 欠落・空は既定セット
//! - 関係: 端点が空のものは除外、1件も無ければ既定ルールで推論

use crate::catalog::IndustryBenchmark;
use crate::error::{Error, Result};
use crate::inferencer::{derive_process_flow, infer};
use crate::synthesizer::cycle;
use crate::types::{
    default_iso_clauses, default_owner, Interaction, Process, ProcessCategory, ProcessFlow,
    ProcessMap, DEFAULT_KPI, DEFAULT_RISK,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// インプット/アウトプットの最大件数
pub const MAX_LIST_ITEMS: usize = 4;

/// 未検証のプロセス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProcess {
    pub name: Value,
    pub category: Value,
    pub inputs: Value,
    pub outputs: Value,
    pub risk: Value,
    pub kpi: Value,
    pub owner: Value,
    pub iso_clauses: Value,
}

/// 未検証の関係
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInteraction {
    pub from: Value,
    pub to: Value,
    pub description: Value,
}

/// 生成結果（未検証）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorPayload {
    pub processes: Vec<RawProcess>,
    pub interactions: Vec<RawInteraction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_flow: Option<Value>,
}

/// 文字列として取り出す（空白のみは欠落扱い）
fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// 文字列リストとして取り出す
fn as_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        other => as_text(other).into_iter().collect(),
    }
}

fn truncated(mut items: Vec<String>) -> Vec<String> {
    items.truncate(MAX_LIST_ITEMS);
    items
}

/// 生成結果を正規化して `ProcessMap` に変換
///
/// # Arguments
/// * `payload` - 未検証の生成結果
/// * `benchmark` - 既定値（リスク/KPI）に使うベンチマーク
///
/// # Returns
/// * `Ok(ProcessMap)` - 正規化済みのマップ
/// * `Err(Error::Parse)` - 有効なプロセスが1件も無い場合
pub fn normalize_payload(
    payload: &GeneratorPayload,
    benchmark: Option<&IndustryBenchmark>,
) -> Result<ProcessMap> {
    let risks = benchmark.map(|b| b.risks.as_slice());
    let kpis = benchmark.map(|b| b.kpis.as_slice());
    let mut seen = HashSet::new();
    let mut processes = Vec::new();

    for raw in &payload.processes {
        let Some(name) = as_text(&raw.name) else {
            debug!("generated process without a name dropped");
            continue;
        };
        if !seen.insert(name.to_lowercase()) {
            debug!(process = %name, "duplicate generated process dropped");
            continue;
        }

        let index = processes.len();
        let category = as_text(&raw.category)
            .and_then(|c| ProcessCategory::parse_lenient(&c))
            .unwrap_or_default();
        let iso_clauses = match as_list(&raw.iso_clauses) {
            list if list.is_empty() => default_iso_clauses(),
            list => list,
        };

        processes.push(Process {
            id: (index + 1).to_string(),
            category,
            inputs: truncated(as_list(&raw.inputs)),
            outputs: truncated(as_list(&raw.outputs)),
            risk: as_text(&raw.risk).unwrap_or_else(|| cycle(risks, index, DEFAULT_RISK).to_string()),
            kpi: as_text(&raw.kpi).unwrap_or_else(|| cycle(kpis, index, DEFAULT_KPI).to_string()),
            owner: as_text(&raw.owner).unwrap_or_else(|| default_owner(&name)),
            iso_clauses,
            name,
        });
    }

    if processes.is_empty() {
        return Err(Error::Parse("generated payload contains no usable processes".into()));
    }

    let mut interactions: Vec<Interaction> = payload
        .interactions
        .iter()
        .filter_map(|raw| {
            let from = as_text(&raw.from)?;
            let to = as_text(&raw.to)?;
            Some(Interaction::new(from, to, as_text(&raw.description)))
        })
        .collect();
    if interactions.is_empty() {
        interactions = infer(&processes);
    }

    let mut map = ProcessMap::new(processes, interactions);
    let flow = payload
        .process_flow
        .clone()
        .and_then(|v| serde_json::from_value::<ProcessFlow>(v).ok())
        .filter(|f| !f.primary_flow.is_empty())
        .unwrap_or_else(|| derive_process_flow(&map));
    map.process_flow = Some(flow);
    Ok(map)
}
