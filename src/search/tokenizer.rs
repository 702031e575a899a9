//! Query normalization / 查询标准化
//!
//! Matching is substring containment over lower-cased text; splitting goes no
//! further than whitespace. / 匹配基于小写子串包含，分词仅按空白切分。

/// Normalize a query: trim, lowercase, collapse whitespace / 标准化查询
pub fn normalize_query(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a normalized query into words / 将标准化查询切分为词
pub fn query_words(normalized: &str) -> Vec<String> {
    normalized.split_whitespace().map(String::from).collect()
}

/// First case-insensitive occurrence of the query in the title, in the
/// title's original casing; falls back to the first query word.
/// / 标题中查询的首次命中片段（保留原始大小写），未命中时退回第一个查询词。
pub fn extract_highlight(title: &str, normalized_query: &str, query_words: &[String]) -> String {
    if !normalized_query.is_empty() {
        for (start, _) in title.char_indices() {
            if let Some(end) = match_from(title, start, normalized_query) {
                return title[start..end].to_string();
            }
        }
    }
    query_words.first().cloned().unwrap_or_default()
}

/// Match the lower-cased needle against `title[start..]` one character at a
/// time, so the returned end offset stays valid in the original string even
/// where lowercasing changes byte lengths. / 逐字符匹配，偏移量始终对应原串。
fn match_from(title: &str, start: usize, needle_lower: &str) -> Option<usize> {
    let mut remaining = needle_lower;
    for (offset, ch) in title[start..].char_indices() {
        if remaining.is_empty() {
            return Some(start + offset);
        }
        let lowered: String = ch.to_lowercase().collect();
        remaining = remaining.strip_prefix(lowered.as_str())?;
    }
    if remaining.is_empty() {
        Some(title.len())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Oak   Avenue "), "oak avenue");
        assert_eq!(normalize_query("SANDTON"), "sandton");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_query_words() {
        assert_eq!(query_words("oak avenue"), vec!["oak", "avenue"]);
        assert!(query_words("").is_empty());
    }

    #[test]
    fn test_highlight_preserves_original_casing() {
        let words = query_words("oak");
        assert_eq!(
            extract_highlight("12 Oak Avenue, Sandton", "oak", &words),
            "Oak"
        );
    }

    #[test]
    fn test_highlight_handles_case_folding_length_changes() {
        // 'İ' lowercases to two code points, so byte offsets in the lowered
        // string do not line up with the original
        let normalized = normalize_query("İstanbul");
        let words = query_words(&normalized);
        assert_eq!(
            extract_highlight("İstanbul Office", &normalized, &words),
            "İstanbul"
        );
    }

    #[test]
    fn test_highlight_matches_mid_string() {
        let words = query_words("avenue");
        assert_eq!(
            extract_highlight("12 Oak Avenue, Sandton", "avenue", &words),
            "Avenue"
        );
    }

    #[test]
    fn test_highlight_falls_back_to_first_word() {
        let words = query_words("willow creek");
        assert_eq!(
            extract_highlight("12 Oak Avenue, Sandton", "willow creek", &words),
            "willow"
        );
    }
}
