//! 生成結果キャッシュモジュール
//!
//! (生成アダプタ, 業界名, プロセス一覧, モデル) のSHA-256をキーにして生成アダプタの
//! 生テキストをキャッシュし、同じ入力での再生成をスキップする。

use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CACHE_FILE_NAME: &str = ".process-map-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// キー → 生成結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub industry: String,
    pub model: String,
    /// 保存日時（RFC 3339）
    pub created_at: String,
    /// 生成アダプタの生テキスト
    pub response: String,
}

impl ResponseCache {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（無い・壊れている場合は空）
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, ResponseCache>(reader) {
            Ok(cache) => {
                if cache.version != Self::CURRENT_VERSION {
                    warn!("キャッシュバージョン不一致、再生成します");
                    return Self::default();
                }
                cache
            }
            Err(e) => {
                warn!("キャッシュを読み込めません: {}", e);
                Self::default()
            }
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除
    ///
    /// # Returns
    /// 削除した場合 `true`
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.response.as_str())
    }

    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, industry: &str, model: &str, response: String) {
        self.entries.insert(
            key,
            CacheEntry {
                industry: industry.to_string(),
                model: model.to_string(),
                created_at: Utc::now().to_rfc3339(),
                response,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// キャッシュキー（SHA-256 hex）
///
/// 生成アダプタ名・業界名（前後空白除去・小文字化）・プロセス名（前後空白除去）・モデルを結合する。
pub fn cache_key(provider: &str, industry: &str, processes: &[String], model: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(provider.as_bytes());
    hasher.update([0xfeu8]);
    hasher.update(industry.trim().to_lowercase().as_bytes());
    for process in processes {
        hasher.update([0u8]);
        hasher.update(process.trim().as_bytes());
    }
    hasher.update([0xffu8]);
    hasher.update(model.as_bytes());
    hex::encode(hasher.finalize())
}
