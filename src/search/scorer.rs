//! Relevance scorer - pure additive scoring / 相关性打分
//!
//! No match implies no score: the priority and recency bonuses only apply to
//! an entry that already matched textually, so a high-priority entry with zero
//! textual overlap never surfaces. / 无命中则无得分：优先级与新近度加成只作用于
//! 已有文本命中的条目。

use chrono::{DateTime, Duration, Utc};

use super::schema::IndexEntry;

const EXACT_TITLE_BONUS: i32 = 100;
const TITLE_PREFIX_BONUS: i32 = 80;
const TITLE_SUBSTRING_BONUS: i32 = 60;
const WORD_IN_TITLE_BONUS: i32 = 30;
const WORD_IN_TEXT_BONUS: i32 = 10;
const PRIORITY_WEIGHT: i32 = 5;
const RECENT_DAY_BONUS: i32 = 10;
const RECENT_WEEK_BONUS: i32 = 5;
/// Words shorter than this never contribute / 短于此长度的词不参与打分
const MIN_WORD_LEN: usize = 2;

/// Score one entry against one query / 对单条记录打分
///
/// Additive, in a fixed order and magnitude so independent implementations
/// are bit-for-bit comparable:
/// exact title +100, else prefix +80, else substring +60; each query word of
/// length ≥ 2: title substring +30 else search_text substring +10; then
/// priority × 5 and a recency bonus (+10 under a day, +5 under a week), both
/// only if something above matched.
pub fn score(
    entry: &IndexEntry,
    normalized_query: &str,
    query_words: &[String],
    now: DateTime<Utc>,
) -> i32 {
    let title_lower = entry.title.to_lowercase();
    let mut score = 0;

    if title_lower == normalized_query {
        score += EXACT_TITLE_BONUS;
    } else if title_lower.starts_with(normalized_query) {
        score += TITLE_PREFIX_BONUS;
    } else if title_lower.contains(normalized_query) {
        score += TITLE_SUBSTRING_BONUS;
    }

    for word in query_words {
        if word.chars().count() < MIN_WORD_LEN {
            continue;
        }
        if title_lower.contains(word.as_str()) {
            score += WORD_IN_TITLE_BONUS;
        } else if entry.search_text.contains(word.as_str()) {
            score += WORD_IN_TEXT_BONUS;
        }
    }

    // 没有任何文本命中就直接返回 0，不加基础分
    if score == 0 {
        return 0;
    }

    score += entry.priority * PRIORITY_WEIGHT;

    let age = now.signed_duration_since(entry.updated_at);
    if age < Duration::days(1) {
        score += RECENT_DAY_BONUS;
    } else if age < Duration::days(7) {
        score += RECENT_WEEK_BONUS;
    }

    score
}
