// src/utils.rs

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

// Unicode 大类 C 覆盖控制符、格式符等所有不可见字符
static CONTROL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{C}").unwrap());

/// 清洗任意来源的显示文本，使其可以安全地作为清单行和文件名使用。
///
/// 分三步: 移除所有 Unicode 控制/格式字符；NFKD 规范化后只保留 ASCII
/// (无 ASCII 对应的字符直接丢弃)；把 `:`、`/`、`|`、`\` 替换为 `_`
/// (`:` 是清单行的分隔符，其余是文件系统保留字符)。
/// 全函数，空输入得到空输出，且满足幂等性。
pub fn sanitize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped = CONTROL_CHARS_RE.replace_all(text, "");
    let ascii: String = stripped.nfkd().filter(char::is_ascii).collect();
    ascii.replace([':', '/', '|', '\\'], "_")
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}
