//! Relevance Scoring & Ranking
//!
//! Free-text search over the summary catalog. Each candidate is scored by a
//! fixed first-match cascade; the evaluation order is part of the contract
//! (id rules before name rules), so a numeric query that also happens to
//! occur in a name still ranks by the stronger id rule.

use crate::core::api::names::normalize_text;
use crate::core::model::{Language, PokemonSummary};

/// Match quality for one candidate against a normalized query. Returns 0
/// when the candidate should be excluded.
pub fn match_score(summary: &PokemonSummary, query: &str, lang: Language) -> u32 {
    let id_str = summary.id.to_string();

    if id_str == query {
        return 100;
    }
    if id_str.starts_with(query) {
        return 90;
    }

    let name = normalize_text(summary.name(lang));
    if name.starts_with(query) {
        return 80;
    }
    if name.contains(query) {
        return 60;
    }

    if summary
        .abilities(lang)
        .iter()
        .any(|ability| normalize_text(ability).contains(query))
    {
        return 50;
    }

    if id_str.contains(query) {
        return 40;
    }

    0
}

struct ScoredCandidate {
    id: u32,
    id_len: usize,
    score: u32,
    name: String,
}

/// Score and order candidates for a non-empty normalized query. Candidates
/// scoring 0 are dropped. Ordering: score descending; ties among id-based
/// matches (score >= 90) by id-string length then numeric id ascending;
/// other ties by localized display name, with the numeric id as the final
/// stable key.
pub fn rank<'a, I>(candidates: I, query: &str, lang: Language) -> Vec<u32>
where
    I: IntoIterator<Item = &'a PokemonSummary>,
{
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter_map(|summary| {
            let score = match_score(summary, query, lang);
            (score > 0).then(|| ScoredCandidate {
                id: summary.id,
                id_len: summary.id.to_string().len(),
                score,
                name: normalize_text(summary.name(lang)),
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| {
                if a.score >= 90 {
                    a.id_len.cmp(&b.id_len).then(a.id.cmp(&b.id))
                } else {
                    a.name.cmp(&b.name)
                }
            })
            .then(a.id.cmp(&b.id))
    });

    scored.into_iter().map(|c| c.id).collect()
}
