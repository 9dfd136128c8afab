//! SVGフロー図生成（共通ライブラリ）
//!
//! `FlowLayout` をそのまま描画する。接続線は中心同士を結ぶ直線で、
//! 矢印が隠れないよう終点だけ相手ノードの枠で切り詰める。

use crate::layout::{FlowLayout, FlowNode, StyleBucket};
use regex::Regex;
use std::fmt::Write;

/// タイトル領域の高さ（px）
pub const TITLE_HEIGHT: f32 = 40.0;

/// 凡例領域の高さ（px）
pub const LEGEND_HEIGHT: f32 = 36.0;

/// ラベルの行間（px）
pub const LINE_HEIGHT: f32 = 16.0;

pub const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// XML/HTML用エスケープ
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 要素IDとして使える文字列に変換
pub fn svg_safe_id(text: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[^A-Za-z0-9_-]+").unwrap();
    }
    let id = UNSAFE_RE.replace_all(text.trim(), "-");
    let id = id.trim_matches('-').to_lowercase();
    if id.is_empty() {
        "node".to_string()
    } else {
        id
    }
}

/// 終点を相手ノードの枠上まで戻す
fn clip_to_box(x1: f32, y1: f32, x2: f32, y2: f32, half_w: f32, half_h: f32) -> (f32, f32) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    if dx == 0.0 && dy == 0.0 {
        return (x2, y2);
    }
    let tx = if dx == 0.0 { f32::INFINITY } else { half_w / dx.abs() };
    let ty = if dy == 0.0 { f32::INFINITY } else { half_h / dy.abs() };
    let t = tx.min(ty).min(1.0);
    (x2 - dx * t, y2 - dy * t)
}

fn write_node(svg: &mut String, node: &FlowNode) {
    let style = node.bucket.style();
    let _ = writeln!(
        svg,
        r#"  <g class="node {bucket}" id="node-{id}">"#,
        bucket = node.bucket.as_str(),
        id = svg_safe_id(&node.id),
    );
    let _ = writeln!(
        svg,
        r#"    <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="8" fill="{}" stroke="{}" stroke-width="2"/>"#,
        node.x, node.y, node.width, node.height, style.fill, style.stroke,
    );
    let _ = writeln!(svg, "    <title>{}</title>", escape_xml(&node.name));

    let lines = node.label_lines.len() as f32;
    let first_y = node.center_y - (lines - 1.0) * LINE_HEIGHT / 2.0;
    for (i, line) in node.label_lines.iter().enumerate() {
        let _ = writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="middle" font-size="13" fill="{}">{}</text>"#,
            node.center_x,
            first_y + i as f32 * LINE_HEIGHT,
            style.text,
            escape_xml(line),
        );
    }
    svg.push_str("  </g>\n");
}

fn write_legend(svg: &mut String, layout: &FlowLayout, top: f32) {
    let has_unknown = layout.nodes.iter().any(|n| n.bucket == StyleBucket::Unknown);
    svg.push_str(r#"  <g class="legend">"#);
    svg.push('\n');
    let mut x = 20.0;
    for bucket in StyleBucket::ALL {
        if bucket == StyleBucket::Unknown && !has_unknown {
            continue;
        }
        let style = bucket.style();
        let _ = writeln!(
            svg,
            r#"    <rect x="{:.1}" y="{:.1}" width="16" height="16" rx="3" fill="{}" stroke="{}"/>"#,
            x, top + 10.0, style.fill, style.stroke,
        );
        let _ = writeln!(
            svg,
            r##"    <text x="{:.1}" y="{:.1}" font-size="12" dominant-baseline="middle" fill="#333333">{}</text>"##,
            x + 22.0,
            top + 18.0,
            bucket.as_str(),
        );
        x += 130.0;
    }
    svg.push_str("  </g>\n");
}

/// フロー図をSVG文字列に変換
///
/// # Arguments
/// * `layout` - 計算済みのフローレイアウト
/// * `title` - 図の上部に表示するタイトル（`None` なら出さない）
pub fn render_flow_svg(layout: &FlowLayout, title: Option<&str>) -> String {
    let offset = if title.is_some() { TITLE_HEIGHT } else { 0.0 };
    let total_height = layout.height + offset + LEGEND_HEIGHT;
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="{font}">"#,
        w = layout.width,
        h = total_height,
        font = FONT_FAMILY,
    );
    svg.push_str(concat!(
        "  <defs>\n",
        "    <marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"8\" markerHeight=\"8\" orient=\"auto-start-reverse\">\n",
        "      <path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"#555555\"/>\n",
        "    </marker>\n",
        "  </defs>\n",
    ));
    let _ = writeln!(
        svg,
        r##"  <rect width="100%" height="100%" fill="#FFFFFF"/>"##
    );

    if let Some(title) = title {
        let _ = writeln!(
            svg,
            r##"  <text x="{:.1}" y="26" text-anchor="middle" font-size="20" font-weight="bold" fill="#222222">{}</text>"##,
            layout.width / 2.0,
            escape_xml(title),
        );
    }

    let _ = writeln!(svg, r#"  <g transform="translate(0,{:.0})">"#, offset);

    for c in &layout.connectors {
        let target = layout.nodes.iter().find(|n| n.name == c.to);
        let (x2, y2) = match target {
            Some(n) => clip_to_box(c.x1, c.y1, c.x2, c.y2, n.width / 2.0, n.height / 2.0),
            None => (c.x2, c.y2),
        };
        let _ = write!(
            svg,
            r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#555555" stroke-width="1.5" marker-end="url(#arrow)">"##,
            c.x1, c.y1, x2, y2,
        );
        let _ = writeln!(
            svg,
            "<title>{} → {}{}</title></line>",
            escape_xml(&c.from),
            escape_xml(&c.to),
            c.description
                .as_deref()
                .map(|d| format!(": {}", escape_xml(d)))
                .unwrap_or_default(),
        );
    }

    for node in &layout.nodes {
        write_node(&mut svg, node);
    }
    svg.push_str("  </g>\n");

    write_legend(&mut svg, layout, layout.height + offset);
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::flow_layout;
    use crate::types::{Interaction, Process, ProcessCategory};

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("R&D <core> \"x\" 'y'"), "R&amp;D &lt;core&gt; &quot;x&quot; &#39;y&#39;");
    }

    #[test]
    fn test_svg_safe_id() {
        assert_eq!(svg_safe_id("Order Fulfillment & Shipping"), "order-fulfillment-shipping");
        assert_eq!(svg_safe_id("12"), "12");
        assert_eq!(svg_safe_id("  &&  "), "node");
    }

    #[test]
    fn test_clip_to_box() {
        let (x, y) = clip_to_box(0.0, 0.0, 100.0, 0.0, 20.0, 10.0);
        assert!((x - 80.0).abs() < 0.001);
        assert!(y.abs() < 0.001);
        assert_eq!(clip_to_box(5.0, 5.0, 5.0, 5.0, 1.0, 1.0), (5.0, 5.0));
    }

    #[test]
    fn test_render_flow_svg() {
        let processes = vec![
            Process::new("1", "R&D", ProcessCategory::Core),
            Process::new("2", "Build", ProcessCategory::Core),
            Process::new("3", "HR", ProcessCategory::Support),
        ];
        let interactions = vec![
            Interaction::new("R&D", "Build", Some("Designs".into())),
            Interaction::new("Build", "Ghost", None),
        ];
        let layout = flow_layout(&processes, &interactions);
        let svg = render_flow_svg(&layout, Some("Plant <A>"));

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Plant &lt;A&gt;"));
        assert!(svg.contains("R&amp;D"));
        assert!(svg.contains("marker-end=\"url(#arrow)\""));
        assert_eq!(svg.matches("<line ").count(), 1);
        assert_eq!(svg.matches("class=\"node ").count(), 3);
        assert!(svg.contains("class=\"node support\""));
        assert!(!svg.contains(">unknown<"));
    }

    #[test]
    fn test_render_empty_layout() {
        let svg = render_flow_svg(&flow_layout(&[], &[]), None);
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("class=\"node "));
        assert!(!svg.contains("<line "));
    }
}
