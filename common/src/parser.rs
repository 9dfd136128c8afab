//! 生成レスポンスパーサー
//!
//! 言語モデルのレスポンスからJSONを抽出し、未検証の `GeneratorPayload` にパースする

use crate::error::{Error, Result};
use crate::generator::GeneratorPayload;

/// レスポンスからJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. ``` ... ``` ブロック（先頭が `{` のもの）
/// 3. 生の {...}（最初の `{` から最後の `}` まで）
/// 4. エラー
///
/// # Examples
/// ```
/// use process_map_common::extract_json;
///
/// let response = "Here you go: {\"processes\": []} Enjoy.";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"processes\": []}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 言語指定なしのフェンス
    if let Some(start_marker) = response.find("```") {
        let start = start_marker + 3;
        if let Some(end_offset) = response[start..].find("```") {
            let block = response[start..start + end_offset].trim();
            if block.starts_with('{') {
                return Ok(block);
            }
        }
    }

    // 生の {...} を探す
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSON object not found in response".into()))
}

/// 生成レスポンスをパース
///
/// # Returns
/// * `Ok(GeneratorPayload)` - パース成功（内容は未検証）
/// * `Err(Error::Parse)` - JSONが見つからないか構造が不正
pub fn parse_generator_response(response: &str) -> Result<GeneratorPayload> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("generator JSON parse error: {}", e)))
}
