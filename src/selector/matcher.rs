//! Fuzzy matching for the profile selector.
//!
//! Uses the skim V2 scorer: the query must appear in the candidate as an
//! ordered subsequence, ignoring case. Contiguous runs and matches at word
//! boundaries score higher, gaps score lower. Equal scores keep the
//! candidates' original order.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// A candidate that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Position of the candidate in the unfiltered list
    pub index: usize,
    /// Higher is better; zero for the empty query
    pub score: i64,
    /// Char offsets of the matched characters, for highlighting
    pub positions: Vec<usize>,
}

pub struct ProfileMatcher {
    matcher: SkimMatcherV2,
}

impl Default for ProfileMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileMatcher {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Filters and ranks `candidates` against `query`.
    ///
    /// The empty query keeps every candidate in its original order.
    pub fn filter(&self, candidates: &[String], query: &str) -> Vec<Match> {
        if query.is_empty() {
            return candidates
                .iter()
                .enumerate()
                .map(|(index, _)| Match {
                    index,
                    score: 0,
                    positions: Vec::new(),
                })
                .collect();
        }

        let mut matches: Vec<Match> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                self.matcher
                    .fuzzy_indices(candidate, query)
                    .map(|(score, positions)| Match {
                        index,
                        score,
                        positions,
                    })
            })
            .collect();

        // Stable, so ties stay in file order
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }
}
