//! process-map-rust
//!
//! 業界ベンチマークからISO 9001プロセスマップを合成し、
//! レイアウト計算・各形式出力・対話編集を行うCLIのライブラリ部分。
//! エンジン本体は `process_map_common` にある。

pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod generator;
pub mod logging;
