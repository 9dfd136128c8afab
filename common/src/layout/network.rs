//! ネットワークレイアウト
//!
//! 区分（管理 → 主要 → 支援）ごとにグループ化し、各プロセスの
//! 受信元（`to == name`）と送信先（`from == name`）を並べる。
//! 空のリストは `None` にして見出しごと出さない。

use crate::types::{Interaction, Process, ProcessCategory};
use serde::Serialize;

pub const RECEIVES_FROM_LABEL: &str = "Receives from";
pub const SENDS_TO_LABEL: &str = "Sends to";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receives_from: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sends_to: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkGroup {
    pub category: ProcessCategory,
    pub label: &'static str,
    pub nodes: Vec<NetworkNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkLayout {
    pub groups: Vec<NetworkGroup>,
}

impl NetworkLayout {
    pub fn node(&self, name: &str) -> Option<&NetworkNode> {
        self.groups
            .iter()
            .flat_map(|g| g.nodes.iter())
            .find(|n| n.name == name)
    }
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}

/// ネットワークレイアウトを計算（空の区分グループは出さない）
pub fn network_layout(processes: &[Process], interactions: &[Interaction]) -> NetworkLayout {
    let groups = ProcessCategory::DISPLAY_ORDER
        .iter()
        .map(|&category| NetworkGroup {
            category,
            label: category.label(),
            nodes: processes
                .iter()
                .filter(|p| p.category == category)
                .map(|p| NetworkNode {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    receives_from: non_empty(
                        interactions
                            .iter()
                            .filter(|i| i.to == p.name)
                            .map(|i| i.from.clone())
                            .collect(),
                    ),
                    sends_to: non_empty(
                        interactions
                            .iter()
                            .filter(|i| i.from == p.name)
                            .map(|i| i.to.clone())
                            .collect(),
                    ),
                })
                .collect(),
        })
        .filter(|g: &NetworkGroup| !g.nodes.is_empty())
        .collect();

    NetworkLayout { groups }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receives_and_sends() {
        let processes = vec![
            Process::new("1", "A", ProcessCategory::Core),
            Process::new("2", "B", ProcessCategory::Core),
            Process::new("3", "C", ProcessCategory::Support),
        ];
        let interactions = vec![
            Interaction::new("A", "B", None),
            Interaction::new("C", "B", None),
        ];
        let layout = network_layout(&processes, &interactions);

        let a = layout.node("A").unwrap();
        assert!(a.receives_from.is_none());
        assert_eq!(a.sends_to.as_deref(), Some(&["B".to_string()][..]));

        let b = layout.node("B").unwrap();
        assert_eq!(b.receives_from.as_ref().unwrap(), &vec!["A", "C"]);
        // 送信先なし → セクション自体を省略
        assert!(b.sends_to.is_none());
    }

    #[test]
    fn test_no_outgoing_omits_key_in_json() {
        let processes = vec![Process::new("1", "Lonely", ProcessCategory::Core)];
        let layout = network_layout(&processes, &[]);
        let json = serde_json::to_string(&layout).unwrap();
        assert!(!json.contains("sendsTo"));
        assert!(!json.contains("receivesFrom"));
    }

    #[test]
    fn test_group_order_and_empty_groups() {
        let processes = vec![
            Process::new("1", "Make", ProcessCategory::Core),
            Process::new("2", "Plan", ProcessCategory::Management),
        ];
        let layout = network_layout(&processes, &[]);
        let order: Vec<ProcessCategory> = layout.groups.iter().map(|g| g.category).collect();
        assert_eq!(order, vec![ProcessCategory::Management, ProcessCategory::Core]);
        assert!(network_layout(&[], &[]).groups.is_empty());
    }

    #[test]
    fn test_dangling_names_listed_as_text() {
        let processes = vec![Process::new("1", "A", ProcessCategory::Core)];
        let interactions = vec![Interaction::new("A", "Ghost", None)];
        let layout = network_layout(&processes, &interactions);
        assert_eq!(layout.node("A").unwrap().sends_to.as_ref().unwrap(), &vec!["Ghost"]);
        assert!(layout.node("Ghost").is_none());
    }
}
