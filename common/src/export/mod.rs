//! Export core modules shared by the CLI exporters.
//!
//! 文字列/バイト列の生成のみ行い、ファイル書き込みは呼び出し側で行う。

pub mod csv_core;
pub mod html_core;
pub mod svg_core;

#[cfg(feature = "excel")]
pub mod excel_core;

use crate::error::Result;
use crate::types::ProcessMap;

/// プロセスマップを整形済みJSONに変換
pub fn map_to_json(map: &ProcessMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(map)?)
}

/// JSONからプロセスマップを読み込む
pub fn map_from_json(json: &str) -> Result<ProcessMap> {
    Ok(serde_json::from_str(json)?)
}
