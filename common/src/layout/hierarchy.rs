//! 階層レイアウト
//!
//! 管理 → 主要 → 支援 の3段（上から下）。
//! 主要段は左から右へ並べ、隣接ペアをコネクタで結ぶ（表示のみ、関係データとは無関係）。
//! 明示的な関係は主要段の下に注記リストとして出す。

use crate::types::{Interaction, Process, ProcessCategory};
use serde::Serialize;

/// 段内のエントリ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandEntry {
    pub id: String,
    pub name: String,
    pub owner: String,
}

/// 区分ごとの段（常に3段、空の段は描画側でスキップ）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyBand {
    pub category: ProcessCategory,
    pub label: &'static str,
    pub processes: Vec<BandEntry>,
}

/// 主要段の隣接コネクタ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreConnector {
    pub from: String,
    pub to: String,
}

/// 関係の注記
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionAnnotation {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyLayout {
    pub bands: Vec<HierarchyBand>,
    pub core_connectors: Vec<CoreConnector>,
    pub annotations: Vec<InteractionAnnotation>,
}

impl HierarchyLayout {
    pub fn band(&self, category: ProcessCategory) -> Option<&HierarchyBand> {
        self.bands.iter().find(|b| b.category == category)
    }
}

/// 階層レイアウトを計算
pub fn hierarchy_layout(processes: &[Process], interactions: &[Interaction]) -> HierarchyLayout {
    let bands: Vec<HierarchyBand> = ProcessCategory::DISPLAY_ORDER
        .iter()
        .map(|&category| HierarchyBand {
            category,
            label: category.label(),
            processes: processes
                .iter()
                .filter(|p| p.category == category)
                .map(|p| BandEntry {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    owner: p.owner.clone(),
                })
                .collect(),
        })
        .collect();

    let core_connectors = bands
        .iter()
        .find(|b| b.category == ProcessCategory::Core)
        .map(|core| {
            core.processes
                .windows(2)
                .map(|pair| CoreConnector {
                    from: pair[0].name.clone(),
                    to: pair[1].name.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let annotations = interactions
        .iter()
        .map(|i| InteractionAnnotation {
            from: i.from.clone(),
            to: i.to.clone(),
            description: i.description.clone(),
        })
        .collect();

    HierarchyLayout {
        bands,
        core_connectors,
        annotations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Process> {
        vec![
            Process::new("1", "Make", ProcessCategory::Core),
            Process::new("2", "HR", ProcessCategory::Support),
            Process::new("3", "Check", ProcessCategory::Core),
            Process::new("4", "Review", ProcessCategory::Management),
            Process::new("5", "Ship", ProcessCategory::Core),
        ]
    }

    #[test]
    fn test_band_order() {
        let layout = hierarchy_layout(&sample(), &[]);
        let order: Vec<ProcessCategory> = layout.bands.iter().map(|b| b.category).collect();
        assert_eq!(order, ProcessCategory::DISPLAY_ORDER.to_vec());
        assert_eq!(layout.bands[0].label, "Management Processes");
    }

    #[test]
    fn test_core_connectors_follow_band_order() {
        // 支援プロセスを挟んでいても主要段では隣接
        let layout = hierarchy_layout(&sample(), &[]);
        let pairs: Vec<(&str, &str)> = layout
            .core_connectors
            .iter()
            .map(|c| (c.from.as_str(), c.to.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Make", "Check"), ("Check", "Ship")]);
    }

    #[test]
    fn test_annotations_include_dangling() {
        let interactions = vec![
            Interaction::new("Make", "Check", Some("Parts".into())),
            Interaction::new("Ghost", "Ship", None),
        ];
        let layout = hierarchy_layout(&sample(), &interactions);
        assert_eq!(layout.annotations.len(), 2);
        assert_eq!(layout.annotations[1].from, "Ghost");
    }

    #[test]
    fn test_empty_input() {
        let layout = hierarchy_layout(&[], &[]);
        assert_eq!(layout.bands.len(), 3);
        assert!(layout.bands.iter().all(|b| b.processes.is_empty()));
        assert!(layout.core_connectors.is_empty());
        assert!(layout.band(ProcessCategory::Core).is_some());
    }
}
