//! プロセスマップの各形式出力（ファイル書き込み）
//!
//! 描画・整形は `process_map_common::export` の純粋関数が担い、
//! ここでは出力先の決定と書き込みだけを行う。

use crate::cli::ExportFormat;
use crate::error::{ProcessMapError, Result};
use process_map_common::export::{csv_core, html_core, map_to_json, svg_core};
use process_map_common::{flow_layout, ProcessMap};
use std::path::{Path, PathBuf};

/// ファイル名に使えない文字を置換
fn file_stem_for(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "process-map".to_string()
    } else {
        stem
    }
}

/// 出力パスを決定
///
/// `output` がディレクトリ（または拡張子なし）ならタイトル名のファイルを置き、
/// ファイルパスなら単一形式はそのまま、複数形式は拡張子だけ差し替える。
pub fn output_paths(output: &Path, title: &str, format: ExportFormat) -> Vec<(ExportFormat, PathBuf)> {
    let formats = format.expand();
    let to_dir = output.is_dir() || output.extension().is_none();

    formats
        .into_iter()
        .filter_map(|f| {
            let ext = f.extension()?;
            let path = if to_dir {
                output.join(format!("{}.{}", file_stem_for(title), ext))
            } else if format != ExportFormat::All {
                output.to_path_buf()
            } else {
                let parent = output.parent().unwrap_or_else(|| Path::new("."));
                let stem = output
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| file_stem_for(title));
                parent.join(format!("{}.{}", stem, ext))
            };
            Some((f, path))
        })
        .collect()
}

/// 指定形式で書き出す
///
/// # Arguments
/// * `map` - 出力するプロセスマップ
/// * `format` - 出力形式（`All` は全形式）
/// * `output` - 出力ファイル/ディレクトリ
/// * `title` - レポート・図のタイトル
///
/// # Returns
/// 書き出したファイルのパス
pub fn export_map(
    map: &ProcessMap,
    format: ExportFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    if output.extension().is_none() && !output.exists() {
        std::fs::create_dir_all(output)?;
    }

    let mut written = Vec::new();
    for (f, path) in output_paths(output, title, format) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        match f {
            ExportFormat::Csv => {
                let content = csv_core::write_csv(&map.processes)?;
                std::fs::write(&path, content)?;
                println!("✔ CSV出力: {}", path.display());
            }
            ExportFormat::Json => {
                std::fs::write(&path, map_to_json(map)?)?;
                println!("✔ JSON出力: {}", path.display());
            }
            ExportFormat::Html => {
                let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
                let html = html_core::render_html_report(map, title, &generated_at);
                std::fs::write(&path, html)?;
                println!("✔ HTML出力: {}", path.display());
            }
            ExportFormat::Svg => {
                let layout = flow_layout(&map.processes, &map.interactions);
                let svg = svg_core::render_flow_svg(&layout, Some(title));
                std::fs::write(&path, svg)?;
                println!("✔ SVG出力: {}", path.display());
            }
            ExportFormat::Excel => {
                if !write_excel(map, &path, format == ExportFormat::Excel)? {
                    continue;
                }
                println!("✔ Excel出力: {}", path.display());
            }
            ExportFormat::All => continue,
        }
        written.push(path);
    }

    Ok(written)
}

#[cfg(feature = "excel")]
fn write_excel(map: &ProcessMap, path: &Path, _explicit: bool) -> Result<bool> {
    let buffer = process_map_common::export::excel_core::generate_excel_buffer(map)
        .map_err(ProcessMapError::Export)?;
    std::fs::write(path, buffer)?;
    Ok(true)
}

#[cfg(not(feature = "excel"))]
fn write_excel(_map: &ProcessMap, _path: &Path, explicit: bool) -> Result<bool> {
    if explicit {
        return Err(ProcessMapError::Export(
            "Excel出力は excel フィーチャー無効のため使用できません".into(),
        ));
    }
    tracing::warn!("excel feature disabled, skipping workbook");
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_stem_for() {
        assert_eq!(file_stem_for("A/B: map"), "A_B_ map");
        assert_eq!(file_stem_for("  "), "process-map");
    }

    #[test]
    fn test_output_paths_dir() {
        let dir = tempdir().expect("Failed to create temp dir");
        let paths = output_paths(dir.path(), "Report", ExportFormat::All);
        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0].1, dir.path().join("Report.csv"));
        assert_eq!(paths[4].1, dir.path().join("Report.xlsx"));
    }

    #[test]
    fn test_output_paths_file() {
        let paths = output_paths(Path::new("out/map.html"), "Report", ExportFormat::Html);
        assert_eq!(paths, vec![(ExportFormat::Html, PathBuf::from("out/map.html"))]);

        let paths = output_paths(Path::new("out/map.html"), "Report", ExportFormat::All);
        assert_eq!(paths[1], (ExportFormat::Json, PathBuf::from("out/map.json")));
    }
}
