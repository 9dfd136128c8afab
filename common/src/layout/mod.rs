//! レイアウトエンジン
//!
//! 同じ `(processes, interactions)` から独立に計算される3種類の投影:
//! - hierarchy: 区分ごとの段表示
//! - network: 受信元/送信先の一覧
//! - flow: 静的出力用のグリッド配置
//!
//! いずれも純粋関数。空入力・未解決の名前で失敗しない。

pub mod flow;
pub mod hierarchy;
pub mod network;
pub mod text;

pub use flow::{flow_layout, grid_columns, FlowConnector, FlowLayout, FlowNode, NodeStyle, StyleBucket};
pub use hierarchy::{hierarchy_layout, HierarchyBand, HierarchyLayout};
pub use network::{network_layout, NetworkGroup, NetworkLayout, NetworkNode};
pub use text::{wrap_label, wrap_text};

use crate::error::Result;
use crate::types::ProcessMap;

/// レイアウトの種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutView {
    #[default]
    Hierarchy,
    Network,
    Flow,
}

impl LayoutView {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutView::Hierarchy => "hierarchy",
            LayoutView::Network => "network",
            LayoutView::Flow => "flow",
        }
    }
}

impl std::str::FromStr for LayoutView {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hierarchy" => Ok(LayoutView::Hierarchy),
            "network" => Ok(LayoutView::Network),
            "flow" => Ok(LayoutView::Flow),
            _ => Err(format!("Unknown view: {}. Use hierarchy, network, or flow", s)),
        }
    }
}

impl std::fmt::Display for LayoutView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 指定ビューのレイアウトをJSON文字列（整形済み）で返す
pub fn layout_json(map: &ProcessMap, view: LayoutView) -> Result<String> {
    let json = match view {
        LayoutView::Hierarchy => {
            serde_json::to_string_pretty(&hierarchy_layout(&map.processes, &map.interactions))?
        }
        LayoutView::Network => {
            serde_json::to_string_pretty(&network_layout(&map.processes, &map.interactions))?
        }
        LayoutView::Flow => {
            serde_json::to_string_pretty(&flow_layout(&map.processes, &map.interactions))?
        }
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Interaction, Process, ProcessCategory};

    #[test]
    fn test_view_from_str() {
        assert_eq!("Flow".parse::<LayoutView>().unwrap(), LayoutView::Flow);
        assert_eq!("network".parse::<LayoutView>().unwrap(), LayoutView::Network);
        assert!("tree".parse::<LayoutView>().is_err());
    }

    #[test]
    fn test_layout_json_all_views() {
        let map = ProcessMap::new(
            vec![
                Process::new("1", "A", ProcessCategory::Core),
                Process::new("2", "B", ProcessCategory::Core),
            ],
            vec![Interaction::new("A", "B", None)],
        );
        let hierarchy = layout_json(&map, LayoutView::Hierarchy).unwrap();
        assert!(hierarchy.contains("coreConnectors"));
        let network = layout_json(&map, LayoutView::Network).unwrap();
        assert!(network.contains("sendsTo"));
        let flow = layout_json(&map, LayoutView::Flow).unwrap();
        assert!(flow.contains("\"columns\": 2"));
    }

    #[test]
    fn test_layout_json_empty_map() {
        let map = ProcessMap::default();
        for view in [LayoutView::Hierarchy, LayoutView::Network, LayoutView::Flow] {
            assert!(layout_json(&map, view).is_ok());
        }
    }
}
