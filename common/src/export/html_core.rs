//! HTMLレポート生成（共通ライブラリ）
//!
//! 単一ファイルで完結するレポート:
//! 1. 概要（区分ごとの件数）
//! 2. 階層ビュー（空の段は出さない）と関係の注記
//! 3. ネットワークビュー（空の受信元/送信先は出さない）
//! 4. プロセス表
//! 5. フロー図（インラインSVG）

use super::svg_core::{escape_xml, render_flow_svg};
use crate::layout::{flow_layout, hierarchy_layout, network_layout};
use crate::layout::network::{RECEIVES_FROM_LABEL, SENDS_TO_LABEL};
use crate::types::{ProcessCategory, ProcessMap};
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; margin: 24px; color: #222; }
h1 { font-size: 24px; margin-bottom: 4px; }
h2 { font-size: 18px; border-bottom: 2px solid #1565C0; padding-bottom: 4px; margin-top: 32px; }
.meta { color: #777; font-size: 12px; }
.band { margin: 12px 0; padding: 8px 12px; border-radius: 6px; }
.band.management { background: #FFF3E0; }
.band.core { background: #E3F2FD; }
.band.support { background: #E8F5E9; }
.chip { display: inline-block; padding: 4px 10px; margin: 4px; border-radius: 12px; background: #FFF; border: 1px solid #999; }
.arrow { color: #555; margin: 0 2px; }
table { border-collapse: collapse; width: 100%; font-size: 13px; }
th, td { border: 1px solid #CCC; padding: 6px; text-align: left; vertical-align: top; }
th { background: #F5F5F5; }
.node { margin: 6px 0 6px 12px; }
.edges { color: #555; font-size: 13px; margin-left: 12px; }
"#;

/// プロセスマップをHTMLレポートに変換
///
/// # Arguments
/// * `map` - 出力対象
/// * `title` - レポートタイトル
/// * `generated_at` - 表示用の作成日時文字列
pub fn render_html_report(map: &ProcessMap, title: &str, generated_at: &str) -> String {
    let title = escape_xml(title);
    let mut html = String::new();

    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{}</title>\n<style>{}</style>\n</head>\n<body>", title, STYLE);
    let _ = writeln!(html, "<h1>{}</h1>", title);
    let _ = writeln!(
        html,
        "<p class=\"meta\">Generated {} &middot; {} processes &middot; {} interactions</p>",
        escape_xml(generated_at),
        map.len(),
        map.interactions.len(),
    );

    if map.is_empty() {
        html.push_str("<p>No processes.</p>\n</body>\n</html>\n");
        return html;
    }

    // ============================================
    // 概要
    // ============================================
    html.push_str("<h2>Summary</h2>\n<ul>\n");
    for category in ProcessCategory::DISPLAY_ORDER {
        let _ = writeln!(
            html,
            "<li>{}: {}</li>",
            category.label(),
            map.by_category(category).count()
        );
    }
    html.push_str("</ul>\n");

    // ============================================
    // 階層ビュー
    // ============================================
    let hierarchy = hierarchy_layout(&map.processes, &map.interactions);
    html.push_str("<h2>Process Hierarchy</h2>\n");
    for band in hierarchy.bands.iter().filter(|b| !b.processes.is_empty()) {
        let _ = writeln!(
            html,
            "<div class=\"band {}\">\n<strong>{}</strong><br>",
            band.category.as_str(),
            band.label
        );
        let separator = if band.category == ProcessCategory::Core {
            "<span class=\"arrow\">&rarr;</span>"
        } else {
            ""
        };
        let chips: Vec<String> = band
            .processes
            .iter()
            .map(|p| format!("<span class=\"chip\">{}</span>", escape_xml(&p.name)))
            .collect();
        html.push_str(&chips.join(separator));
        html.push_str("\n</div>\n");
    }
    if !hierarchy.annotations.is_empty() {
        html.push_str("<h3>Interactions</h3>\n<ul>\n");
        for a in &hierarchy.annotations {
            let _ = write!(html, "<li>{} &rarr; {}", escape_xml(&a.from), escape_xml(&a.to));
            if let Some(d) = &a.description {
                let _ = write!(html, ": {}", escape_xml(d));
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");
    }

    // ============================================
    // ネットワークビュー
    // ============================================
    let network = network_layout(&map.processes, &map.interactions);
    html.push_str("<h2>Process Network</h2>\n");
    for group in &network.groups {
        let _ = writeln!(html, "<h3>{}</h3>", group.label);
        for node in &group.nodes {
            let _ = writeln!(html, "<div class=\"node\"><strong>{}</strong>", escape_xml(&node.name));
            for (label, names) in [
                (RECEIVES_FROM_LABEL, &node.receives_from),
                (SENDS_TO_LABEL, &node.sends_to),
            ] {
                if let Some(names) = names {
                    let joined: Vec<String> = names.iter().map(|n| escape_xml(n)).collect();
                    let _ = writeln!(
                        html,
                        "<div class=\"edges\">{}: {}</div>",
                        label,
                        joined.join(", ")
                    );
                }
            }
            html.push_str("</div>\n");
        }
    }

    // ============================================
    // プロセス表
    // ============================================
    html.push_str("<h2>Process Details</h2>\n<table>\n<tr>");
    for header in ["Process", "Category", "Inputs", "Outputs", "Risk", "KPI", "Owner", "ISO Clauses"] {
        let _ = write!(html, "<th>{}</th>", header);
    }
    html.push_str("</tr>\n");
    for p in &map.processes {
        let cells = [
            escape_xml(&p.name),
            p.category.as_str().to_string(),
            escape_xml(&p.inputs.join(", ")),
            escape_xml(&p.outputs.join(", ")),
            escape_xml(&p.risk),
            escape_xml(&p.kpi),
            escape_xml(&p.owner),
            escape_xml(&p.iso_clauses.join(", ")),
        ];
        html.push_str("<tr>");
        for cell in cells {
            let _ = write!(html, "<td>{}</td>", cell);
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");

    // ============================================
    // フロー図
    // ============================================
    html.push_str("<h2>Process Flow Diagram</h2>\n");
    html.push_str(&render_flow_svg(
        &flow_layout(&map.processes, &map.interactions),
        None,
    ));
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Interaction, Process};

    fn sample() -> ProcessMap {
        ProcessMap::new(
            vec![
                Process::new("1", "Design", ProcessCategory::Core),
                Process::new("2", "Build & Test", ProcessCategory::Core),
                Process::new("3", "Strategy", ProcessCategory::Management),
            ],
            vec![Interaction::new("Design", "Build & Test", Some("Specs".into()))],
        )
    }

    #[test]
    fn test_report_sections() {
        let html = render_html_report(&sample(), "Acme <Report>", "2026-01-01 09:00");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Acme &lt;Report&gt;</h1>"));
        assert!(html.contains("Process Hierarchy"));
        assert!(html.contains("Process Network"));
        assert!(html.contains("Process Details"));
        assert!(html.contains("<svg"));
        assert!(html.contains("Build &amp; Test"));
        assert!(html.contains("Design &rarr; Build &amp; Test: Specs"));
    }

    #[test]
    fn test_empty_bands_and_sections_omitted() {
        let html = render_html_report(&sample(), "Acme", "now");
        // 支援プロセスが無いので支援段は出ない
        assert!(!html.contains("band support"));
        assert!(html.contains("band management"));
        // Strategy は送受信とも無し
        assert!(html.contains("<div class=\"node\"><strong>Strategy</strong>\n</div>"));
        // Build & Test は送信先なし → "Sends to" は Design の1件だけ
        assert_eq!(html.matches("Sends to:").count(), 1);
        assert_eq!(html.matches("Receives from:").count(), 1);
    }

    #[test]
    fn test_empty_map() {
        let html = render_html_report(&ProcessMap::default(), "Empty", "now");
        assert!(html.contains("No processes."));
        assert!(!html.contains("<svg"));
    }
}
