//! 業界名の解決
//!
//! 自由入力の業界名をカタログのエントリに対応付ける。
//! 1. 正規化（trim + 小文字化）
//! 2. ラベルとの双方向の部分一致（カタログ順）
//! 3. キーワード族ルール（順序固定、最初に一致したもの）
//!
//! 何も一致しない場合は `None`。エラーではない。

use crate::catalog::{BenchmarkCatalog, IndustryBenchmark};
use tracing::debug;

/// キーワード族ルール
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub industry: &'static str,
}

/// キーワード族ルール（この順序で評価する）
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule { keywords: &["manufactur", "production"], industry: "Manufacturing" },
    KeywordRule { keywords: &["software", "tech", "development"], industry: "Software Development" },
    KeywordRule { keywords: &["health", "medical", "hospital"], industry: "Healthcare" },
    KeywordRule { keywords: &["financ", "bank", "insurance"], industry: "Financial Services" },
    KeywordRule { keywords: &["consult", "advisory", "professional services"], industry: "Consulting" },
];

/// 業界名を正規化
pub fn normalize_industry(text: &str) -> String {
    text.trim().to_lowercase()
}

impl BenchmarkCatalog {
    /// 自由入力の業界名からベンチマークを解決
    pub fn resolve(&self, industry_text: &str) -> Option<&IndustryBenchmark> {
        let input = normalize_industry(industry_text);
        if input.is_empty() {
            return None;
        }

        // ラベルとの双方向部分一致
        if let Some(found) = self.industries().iter().find(|b| {
            let label = b.industry.to_lowercase();
            label.contains(&input) || input.contains(&label)
        }) {
            debug!(input = %input, industry = %found.industry, "industry resolved by containment");
            return Some(found);
        }

        // キーワード族ルール
        for rule in KEYWORD_RULES {
            if rule.keywords.iter().any(|k| input.contains(k)) {
                match self.get(rule.industry) {
                    Some(found) => {
                        debug!(input = %input, industry = %found.industry, "industry resolved by keyword rule");
                        return Some(found);
                    }
                    // カタログに該当ラベルが無ければ次のルールへ
                    None => continue,
                }
            }
        }

        debug!(input = %input, "no benchmark for industry");
        None
    }
}

/// 組み込みカタログで業界名を解決
pub fn resolve(industry_text: &str) -> Option<&'static IndustryBenchmark> {
    BenchmarkCatalog::builtin().resolve(industry_text)
}
