use super::SuggestionItem;

const TITLE_EXACT: u32 = 100;
const ALIAS_EXACT: u32 = 90;
const GROUP_EXACT: u32 = 80;
const TITLE_PREFIX: u32 = 70;
const ALIAS_PREFIX: u32 = 60;
const GROUP_PREFIX: u32 = 50;
const TITLE_CONTAINS: u32 = 40;
const ALIAS_CONTAINS: u32 = 30;
const GROUP_CONTAINS: u32 = 25;
const SUBTEXT_CONTAINS: u32 = 20;

/// Share of the query that an in-order walk over the title must match.
const SUBSEQUENCE_THRESHOLD: f64 = 0.7;

/// Score one item against an already normalized (lowercased, trimmed) query.
///
/// Rules are additive: an exact title match also counts as a prefix and a
/// substring match.
pub fn score_item(item: &SuggestionItem, query: &str) -> u32 {
    let title = item.title.to_lowercase();
    let group = item.group.to_lowercase();
    let subtext = item.subtext.to_lowercase();
    let aliases: Vec<String> = item.aliases.iter().map(|a| a.to_lowercase()).collect();

    let mut score = 0;

    if title == query {
        score += TITLE_EXACT;
    }
    if aliases.iter().any(|a| a == query) {
        score += ALIAS_EXACT;
    }
    if group == query {
        score += GROUP_EXACT;
    }

    if title.starts_with(query) {
        score += TITLE_PREFIX;
    }
    if aliases.iter().any(|a| a.starts_with(query)) {
        score += ALIAS_PREFIX;
    }
    if group.starts_with(query) {
        score += GROUP_PREFIX;
    }

    if title.contains(query) {
        score += TITLE_CONTAINS;
    }
    if aliases.iter().any(|a| a.contains(query)) {
        score += ALIAS_CONTAINS;
    }
    if group.contains(query) {
        score += GROUP_CONTAINS;
    }
    if subtext.contains(query) {
        score += SUBTEXT_CONTAINS;
    }

    score + subsequence_score(&title, query)
}

/// Typo tolerance: greedy in-order character walk over the title.
fn subsequence_score(text: &str, query: &str) -> u32 {
    // Substring hits are already scored above.
    if text.contains(query) {
        return 0;
    }

    let wanted: Vec<char> = query.chars().collect();
    let mut matched = 0usize;
    for c in text.chars() {
        if matched == wanted.len() {
            break;
        }
        if c == wanted[matched] {
            matched += 1;
        }
    }

    if matched as f64 >= wanted.len() as f64 * SUBSEQUENCE_THRESHOLD {
        matched as u32
    } else {
        0
    }
}

/// Filter and order items by relevance to `query`.
///
/// A blank query returns the items untouched. Otherwise items scoring zero are
/// dropped and the rest are sorted by descending score; the sort is stable, so
/// ties keep their input order.
pub fn score_and_rank(items: Vec<SuggestionItem>, query: &str) -> Vec<SuggestionItem> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return items;
    }

    let mut scored: Vec<(u32, SuggestionItem)> = items
        .into_iter()
        .map(|item| (score_item(&item, &q), item))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}
