//! プロセスマップの型定義
//!
//! CLIとエクスポータで共有される型:
//! - Process: 1つの業務プロセス
//! - Interaction: プロセス間の有向な関係（名前で参照）
//! - ProcessFlow: 主要フロー・支援フロー・フィードバックの要約（派生ビュー）
//! - ProcessMap: 上記の集約。ユーザー編集はここで行う

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 既定のリスク（ベンチマークが無い場合）
pub const DEFAULT_RISK: &str = "Process disruption or delay";

/// 既定のKPI（ベンチマークが無い場合）
pub const DEFAULT_KPI: &str = "Process efficiency";

/// 既定のISO条項セット
pub const DEFAULT_ISO_CLAUSES: &[&str] = &["8.1", "8.2", "9.1"];

/// 自動生成される連結の説明
pub const DEFAULT_INTERACTION_DESCRIPTION: &str = "Process output feeds next process";

/// 既定のオーナー名
pub fn default_owner(name: &str) -> String {
    format!("{} Manager", name)
}

/// 既定のインプット
pub fn default_inputs(name: &str) -> Vec<String> {
    vec![
        format!("{} inputs", name),
        "Requirements".to_string(),
        "Resources".to_string(),
    ]
}

/// 既定のアウトプット
pub fn default_outputs(name: &str) -> Vec<String> {
    vec![
        format!("{} outputs", name),
        "Deliverables".to_string(),
        "Reports".to_string(),
    ]
}

/// 既定のISO条項
pub fn default_iso_clauses() -> Vec<String> {
    DEFAULT_ISO_CLAUSES.iter().map(|s| s.to_string()).collect()
}

/// プロセス区分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessCategory {
    /// 価値を生み出す主要プロセス
    #[default]
    Core,
    /// 主要プロセスを支える支援プロセス
    Support,
    /// 監督・管理プロセス
    Management,
}

impl ProcessCategory {
    /// 表示順（上から: 管理 → 主要 → 支援）
    pub const DISPLAY_ORDER: [ProcessCategory; 3] = [
        ProcessCategory::Management,
        ProcessCategory::Core,
        ProcessCategory::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessCategory::Core => "core",
            ProcessCategory::Support => "support",
            ProcessCategory::Management => "management",
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            ProcessCategory::Core => "Core Processes",
            ProcessCategory::Support => "Support Processes",
            ProcessCategory::Management => "Management Processes",
        }
    }

    /// 大文字小文字・前後空白を無視して解釈する
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "core" => Some(ProcessCategory::Core),
            "support" => Some(ProcessCategory::Support),
            "management" => Some(ProcessCategory::Management),
            _ => None,
        }
    }
}

impl std::str::FromStr for ProcessCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse_lenient(s)
            .ok_or_else(|| format!("Unknown category: {}. Use core, support, or management", s))
    }
}

impl std::fmt::Display for ProcessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 業務プロセス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    pub name: String,
    pub category: ProcessCategory,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    pub risk: String,
    pub kpi: String,
    pub owner: String,
    #[serde(default)]
    pub iso_clauses: Vec<String>,
}

impl Process {
    /// 既定の属性でプロセスを生成
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: ProcessCategory) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            inputs: default_inputs(&name),
            outputs: default_outputs(&name),
            risk: DEFAULT_RISK.to_string(),
            kpi: DEFAULT_KPI.to_string(),
            owner: default_owner(&name),
            iso_clauses: default_iso_clauses(),
            category,
            name,
        }
    }
}

/// プロセス間の有向な関係
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Interaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, description: Option<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            description,
        }
    }

    /// 指定した名前を端点に持つか
    pub fn touches(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}

/// 名前付きの支援フロー
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportingFlow {
    pub name: String,
    pub processes: Vec<String>,
}

/// フィードバックループ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackLoop {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 上位フローの要約（派生ビュー、正ではない）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessFlow {
    pub primary_flow: Vec<String>,
    pub supporting_flows: Vec<SupportingFlow>,
    pub feedback_loops: Vec<FeedbackLoop>,
}

/// ユーザー編集の入力（IDは割り当て側で決める）
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessDraft {
    pub name: String,
    pub category: ProcessCategory,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub risk: String,
    pub kpi: String,
    pub owner: String,
    pub iso_clauses: Vec<String>,
}

impl ProcessDraft {
    /// 既定の属性で下書きを作る
    pub fn named(name: impl Into<String>, category: ProcessCategory) -> Self {
        let p = Process::new("", name, category);
        Self::from(&p)
    }
}

impl From<&Process> for ProcessDraft {
    fn from(p: &Process) -> Self {
        Self {
            name: p.name.clone(),
            category: p.category,
            inputs: p.inputs.clone(),
            outputs: p.outputs.clone(),
            risk: p.risk.clone(),
            kpi: p.kpi.clone(),
            owner: p.owner.clone(),
            iso_clauses: p.iso_clauses.clone(),
        }
    }
}

/// プロセスマップ（集約）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMap {
    pub processes: Vec<Process>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_flow: Option<ProcessFlow>,
    /// 次に割り当てるID（削除済みIDを再利用しないため保持する）
    #[serde(default)]
    next_id: u64,
}

impl ProcessMap {
    pub fn new(processes: Vec<Process>, interactions: Vec<Interaction>) -> Self {
        let mut map = Self {
            processes,
            interactions,
            process_flow: None,
            next_id: 0,
        };
        map.next_id = map.max_numeric_id() + 1;
        map
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// IDでプロセスを検索
    pub fn get(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// 名前でプロセスを検索
    pub fn find_by_name(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.name == name)
    }

    /// 区分ごとのプロセス（入力順を保持）
    pub fn by_category(&self, category: ProcessCategory) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(move |p| p.category == category)
    }

    fn max_numeric_id(&self) -> u64 {
        self.processes
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }

    /// 新しいIDを払い出す（削除済みIDは再利用しない）
    fn allocate_id(&mut self) -> String {
        let id = self.next_id.max(self.max_numeric_id() + 1);
        self.next_id = id + 1;
        id.to_string()
    }

    fn name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        let lower = name.to_lowercase();
        self.processes
            .iter()
            .filter(|p| Some(p.id.as_str()) != except_id)
            .any(|p| p.name.to_lowercase() == lower)
    }

    /// プロセスを追加
    pub fn add_process(&mut self, draft: ProcessDraft) -> Result<&Process> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        if self.name_taken(&name, None) {
            return Err(Error::DuplicateName(name));
        }

        let id = self.allocate_id();
        self.processes.push(Process {
            id,
            name,
            category: draft.category,
            inputs: draft.inputs,
            outputs: draft.outputs,
            risk: draft.risk,
            kpi: draft.kpi,
            owner: draft.owner,
            iso_clauses: draft.iso_clauses,
        });
        Ok(&self.processes[self.processes.len() - 1])
    }

    /// プロセスを更新（名前変更時は関係の端点も書き換える）
    pub fn update_process(&mut self, id: &str, draft: ProcessDraft) -> Result<&Process> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        if self.name_taken(&name, Some(id)) {
            return Err(Error::DuplicateName(name));
        }

        let idx = self
            .processes
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::ProcessNotFound(id.to_string()))?;

        let old_name = std::mem::replace(&mut self.processes[idx].name, name.clone());
        if old_name != name {
            for interaction in &mut self.interactions {
                if interaction.from == old_name {
                    interaction.from = name.clone();
                }
                if interaction.to == old_name {
                    interaction.to = name.clone();
                }
            }
        }

        let process = &mut self.processes[idx];
        process.category = draft.category;
        process.inputs = draft.inputs;
        process.outputs = draft.outputs;
        process.risk = draft.risk;
        process.kpi = draft.kpi;
        process.owner = draft.owner;
        process.iso_clauses = draft.iso_clauses;

        Ok(&self.processes[idx])
    }

    /// プロセスを削除し、その名前を参照する関係も取り除く
    pub fn delete_process(&mut self, id: &str) -> Result<Process> {
        let idx = self
            .processes
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::ProcessNotFound(id.to_string()))?;

        // 削除前にIDカウンタを確定させる
        self.next_id = self.next_id.max(self.max_numeric_id() + 1);

        let removed = self.processes.remove(idx);
        self.interactions.retain(|i| !i.touches(&removed.name));
        Ok(removed)
    }

    /// 関係を追加（存在しない名前も許容する）
    pub fn add_interaction(&mut self, interaction: Interaction) {
        self.interactions.push(interaction);
    }

    /// 関係を削除
    pub fn remove_interaction(&mut self, index: usize) -> Option<Interaction> {
        if index < self.interactions.len() {
            Some(self.interactions.remove(index))
        } else {
            None
        }
    }

    /// 端点が解決できない関係
    pub fn dangling_interactions(&self) -> Vec<&Interaction> {
        self.interactions
            .iter()
            .filter(|i| self.find_by_name(&i.from).is_none() || self.find_by_name(&i.to).is_none())
            .collect()
    }
}
