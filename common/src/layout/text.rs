//! ラベルの折り返し

/// 1行あたりの文字数上限
pub const LABEL_CHARS_PER_LINE: usize = 18;

/// 最大行数
pub const LABEL_MAX_LINES: usize = 2;

/// 貪欲法による単語単位の折り返し
///
/// - 単語は分割しない（1語で上限を超える場合はその語だけで1行）
/// - `max_lines` を超える分の単語は表示から落とす（元データは変更しない）
///
/// # Arguments
/// * `text` - 元の文字列
/// * `width` - 1行あたりの文字数上限
/// * `max_lines` - 最大行数
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            if lines.len() == max_lines {
                return lines;
            }
            current.push_str(word);
        }
    }

    if !current.is_empty() && lines.len() < max_lines {
        lines.push(current);
    }
    lines
}

/// プロセス名を図表示用に折り返す（既定の文字数・行数）
pub fn wrap_label(name: &str) -> Vec<String> {
    wrap_text(name, LABEL_CHARS_PER_LINE, LABEL_MAX_LINES)
}
