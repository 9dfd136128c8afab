//! CSV入出力（共通ライブラリ）
//!
//! 列順: name, category, inputs, outputs, risk, kpi, owner, isoClauses
//! リスト列は `"; "` で連結する。

use crate::error::{Error, Result};
use crate::types::{Process, ProcessCategory};
use csv::{ReaderBuilder, Trim, WriterBuilder};

/// ヘッダー行
pub const CSV_HEADERS: [&str; 8] = [
    "Process Name",
    "Category",
    "Inputs",
    "Outputs",
    "Risk",
    "KPI",
    "Owner",
    "ISO Clauses",
];

/// リスト列の区切り
pub const LIST_SEPARATOR: &str = "; ";

/// リスト列を分割（前後空白除去、空要素除外）
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// プロセスを1行分のフィールドに変換
pub fn process_record(p: &Process) -> [String; 8] {
    [
        p.name.clone(),
        p.category.as_str().to_string(),
        p.inputs.join(LIST_SEPARATOR),
        p.outputs.join(LIST_SEPARATOR),
        p.risk.clone(),
        p.kpi.clone(),
        p.owner.clone(),
        p.iso_clauses.join(LIST_SEPARATOR),
    ]
}

fn csv_error(e: impl std::fmt::Display) -> Error {
    Error::Export(format!("CSV error: {}", e))
}

/// プロセス一覧をCSV文字列に変換
pub fn write_csv(processes: &[Process]) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADERS).map_err(csv_error)?;
    for p in processes {
        writer.write_record(process_record(p)).map_err(csv_error)?;
    }
    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

/// CSV文字列からプロセス一覧を読み込む
///
/// - 1行目はヘッダーとして読み飛ばす
/// - 名前が空の行は無視
/// - 区分は大文字小文字を無視して解釈し、不正なら主要
/// - IDは1始まりの連番を振り直す
pub fn parse_csv(content: &str) -> Result<Vec<Process>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut processes = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::Parse(format!("CSV parse error: {}", e)))?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let name = field(0);
        if name.is_empty() {
            continue;
        }

        let mut process = Process::new(
            (processes.len() + 1).to_string(),
            name,
            ProcessCategory::parse_lenient(field(1)).unwrap_or_default(),
        );
        process.inputs = split_list(field(2));
        process.outputs = split_list(field(3));
        process.risk = field(4).to_string();
        process.kpi = field(5).to_string();
        process.owner = field(6).to_string();
        process.iso_clauses = split_list(field(7));
        processes.push(process);
    }
    Ok(processes)
}
