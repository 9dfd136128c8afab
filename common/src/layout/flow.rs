//! フロー図レイアウト
//!
//! 静的出力（SVG/HTML）用のグリッド配置。
//!
//! ## 配置ルール
//! - `columns = ceil(sqrt(N))`, `rows = ceil(N / columns)`
//! - 入力順に行優先で配置: index `i` → `(i % columns, i / columns)`
//! - セルは固定キャンバスを列数・行数で等分、ノードはセル中央
//! - 両端が解決できる関係のみ中心同士を直線で結ぶ（未解決は無視）

use super::text::wrap_label;
use crate::types::{Interaction, Process};
use serde::Serialize;
use std::collections::HashMap;

// ============================================
// キャンバス定義
// ============================================

/// キャンバスサイズ（px）
pub const CANVAS_WIDTH: f32 = 1200.0;
pub const CANVAS_HEIGHT: f32 = 800.0;

/// キャンバス余白（px）
pub const CANVAS_MARGIN: f32 = 40.0;

/// ノードの最大サイズ（px）
pub const NODE_WIDTH: f32 = 180.0;
pub const NODE_HEIGHT: f32 = 64.0;

/// セル内でノードの周囲に確保する間隔（px）
pub const CELL_GAP: f32 = 24.0;

pub const USABLE_WIDTH: f32 = CANVAS_WIDTH - CANVAS_MARGIN * 2.0;
pub const USABLE_HEIGHT: f32 = CANVAS_HEIGHT - CANVAS_MARGIN * 2.0;

// ============================================
// スタイル
// ============================================

/// 描画スタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub text: &'static str,
}

/// 区分ごとのスタイル区分（不明な区分は Unknown）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleBucket {
    Core,
    Support,
    Management,
    Unknown,
}

impl StyleBucket {
    pub const ALL: [StyleBucket; 4] = [
        StyleBucket::Management,
        StyleBucket::Core,
        StyleBucket::Support,
        StyleBucket::Unknown,
    ];

    /// 区分文字列からスタイル区分を決める
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "core" => StyleBucket::Core,
            "support" => StyleBucket::Support,
            "management" => StyleBucket::Management,
            _ => StyleBucket::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleBucket::Core => "core",
            StyleBucket::Support => "support",
            StyleBucket::Management => "management",
            StyleBucket::Unknown => "unknown",
        }
    }

    pub fn style(&self) -> NodeStyle {
        match self {
            StyleBucket::Core => NodeStyle { fill: "#E3F2FD", stroke: "#1565C0", text: "#0D47A1" },
            StyleBucket::Support => NodeStyle { fill: "#E8F5E9", stroke: "#2E7D32", text: "#1B5E20" },
            StyleBucket::Management => NodeStyle { fill: "#FFF3E0", stroke: "#EF6C00", text: "#E65100" },
            StyleBucket::Unknown => NodeStyle { fill: "#F5F5F5", stroke: "#757575", text: "#424242" },
        }
    }
}

// ============================================
// レイアウト結果
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    pub name: String,
    pub bucket: StyleBucket,
    pub column: usize,
    pub row: usize,
    /// 左上座標
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub center_x: f32,
    pub center_y: f32,
    /// 折り返し済みの表示ラベル（最大2行）
    pub label_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowConnector {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLayout {
    pub width: f32,
    pub height: f32,
    pub columns: usize,
    pub rows: usize,
    pub nodes: Vec<FlowNode>,
    pub connectors: Vec<FlowConnector>,
}

impl FlowLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// 列数を計算（`ceil(sqrt(N))`、N=0 は 0）
pub fn grid_columns(count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let mut columns = (count as f64).sqrt().ceil() as usize;
    // 浮動小数点誤差の補正
    while columns * columns < count {
        columns += 1;
    }
    while columns > 1 && (columns - 1) * (columns - 1) >= count {
        columns -= 1;
    }
    columns
}

/// index のセル位置 `(column, row)`
pub fn grid_cell(index: usize, columns: usize) -> (usize, usize) {
    (index % columns, index / columns)
}

/// フロー図レイアウトを計算
pub fn flow_layout(processes: &[Process], interactions: &[Interaction]) -> FlowLayout {
    let count = processes.len();
    if count == 0 {
        return FlowLayout {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            columns: 0,
            rows: 0,
            nodes: Vec::new(),
            connectors: Vec::new(),
        };
    }

    let columns = grid_columns(count);
    let rows = count.div_ceil(columns);
    let cell_width = USABLE_WIDTH / columns as f32;
    let cell_height = USABLE_HEIGHT / rows as f32;
    let node_width = NODE_WIDTH.min((cell_width - CELL_GAP).max(1.0));
    let node_height = NODE_HEIGHT.min((cell_height - CELL_GAP).max(1.0));

    let nodes: Vec<FlowNode> = processes
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let (column, row) = grid_cell(index, columns);
            let center_x = CANVAS_MARGIN + cell_width * (column as f32 + 0.5);
            let center_y = CANVAS_MARGIN + cell_height * (row as f32 + 0.5);
            FlowNode {
                id: p.id.clone(),
                name: p.name.clone(),
                bucket: StyleBucket::from_label(p.category.as_str()),
                column,
                row,
                x: center_x - node_width / 2.0,
                y: center_y - node_height / 2.0,
                width: node_width,
                height: node_height,
                center_x,
                center_y,
                label_lines: wrap_label(&p.name),
            }
        })
        .collect();

    // 同名がある場合は先頭を採用
    let mut centers: HashMap<&str, (f32, f32)> = HashMap::new();
    for node in &nodes {
        centers
            .entry(node.name.as_str())
            .or_insert((node.center_x, node.center_y));
    }

    let connectors = interactions
        .iter()
        .filter_map(|i| {
            let (x1, y1) = *centers.get(i.from.as_str())?;
            let (x2, y2) = *centers.get(i.to.as_str())?;
            Some(FlowConnector {
                from: i.from.clone(),
                to: i.to.clone(),
                description: i.description.clone(),
                x1,
                y1,
                x2,
                y2,
            })
        })
        .collect();

    FlowLayout {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        columns,
        rows,
        nodes,
        connectors,
    }
}
