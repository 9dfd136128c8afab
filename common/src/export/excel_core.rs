//! Excel生成（共通ライブラリ）
//!
//! "Processes" シート（CSVと同じ列順）と "Interactions" シートを持つブックを生成

use super::csv_core::{process_record, CSV_HEADERS};
use crate::types::ProcessMap;
use rust_xlsxwriter::*;

/// "Processes" シートの列幅（文字数）
const PROCESS_COL_WIDTHS: [f64; 8] = [28.0, 12.0, 36.0, 36.0, 30.0, 26.0, 24.0, 14.0];

/// "Interactions" シートの列幅（文字数）
const INTERACTION_COL_WIDTHS: [f64; 3] = [28.0, 28.0, 40.0];

const INTERACTION_HEADERS: [&str; 3] = ["From", "To", "Description"];

/// Excelをバッファに生成
///
/// # Arguments
/// * `map` - 出力対象のプロセスマップ
pub fn generate_excel_buffer(map: &ProcessMap) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    // フォーマット定義
    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0x555555))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_font_size(11.0)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::Top)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    // プロセス一覧
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Processes")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    for (col, (header, width)) in CSV_HEADERS.iter().zip(PROCESS_COL_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(0, col, *header, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    for (row, process) in map.processes.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, value) in process_record(process).iter().enumerate() {
            worksheet
                .write_string_with_format(row, col as u16, value.as_str(), &value_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    // 関係一覧
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Interactions")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    for (col, (header, width)) in INTERACTION_HEADERS.iter().zip(INTERACTION_COL_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(0, col, *header, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    for (row, interaction) in map.interactions.iter().enumerate() {
        let row = row as u32 + 1;
        let values = [
            interaction.from.as_str(),
            interaction.to.as_str(),
            interaction.description.as_deref().unwrap_or(""),
        ];
        for (col, value) in values.iter().enumerate() {
            worksheet
                .write_string_with_format(row, col as u16, *value, &value_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    // バッファに書き出し
    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
