use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// number of entries a table keeps
pub const HIGHSCORE_CAPACITY: usize = 20;

/// One line of a highscore table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub score: u32,
}

impl fmt::Display for HighScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {:>9}",
            self.name,
            self.score.to_formatted_string(&Locale::en)
        )
    }
}

/// The best scores, highest first. Of equal scores the older one ranks
/// higher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScoreTable {
    entries: Vec<HighScore>,
}

impl HighScoreTable {
    /// would this score make it in to the table
    pub fn is_highscore(&self, score: u32) -> bool {
        score > 0
            && (self.entries.len() < HIGHSCORE_CAPACITY
                || self.entries.last().map_or(true, |last| score > last.score))
    }

    /// Adds a score, returning its rank (0 is the best) or `None` if it was
    /// too low. The lowest entry drops out of a full table.
    pub fn insert(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.is_highscore(score) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|entry| entry.score < score)
            .unwrap_or_else(|| self.entries.len());
        self.entries.insert(
            rank,
            HighScore {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(HIGHSCORE_CAPACITY);
        Some(rank)
    }

    #[allow(missing_docs)]
    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(missing_docs)]
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Display for HighScoreTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{:>2}. {}", i + 1, entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ties_keep_older_first() {
        let mut table = HighScoreTable::default();
        assert_eq!(table.insert("ann", 100), Some(0));
        assert_eq!(table.insert("bob", 100), Some(1));
        assert_eq!(table.insert("cid", 150), Some(0));
        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["cid", "ann", "bob"]);
    }

    #[test]
    fn test_full_table_drops_lowest() {
        let mut table = HighScoreTable::default();
        for score in 1..=HIGHSCORE_CAPACITY as u32 {
            table.insert("x", score * 10);
        }
        assert_eq!(table.len(), HIGHSCORE_CAPACITY);
        assert_eq!(table.insert("low", 10), None);
        assert_eq!(table.insert("mid", 55), Some(15));
        assert_eq!(table.len(), HIGHSCORE_CAPACITY);
        assert_eq!(table.entries().last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_zero_is_not_a_score() {
        let mut table = HighScoreTable::default();
        assert_eq!(table.insert("nobody", 0), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_display() {
        let mut table = HighScoreTable::default();
        table.insert("ann", 12345);
        assert_eq!(table.to_string(), " 1. ann                 12,345\n");
    }

    proptest! {
        #[test]
        fn prop_sorted_and_bounded(scores in proptest::collection::vec(0u32..1000, 0..60)) {
            let mut table = HighScoreTable::default();
            for score in scores.iter() {
                table.insert("p", *score);
            }
            prop_assert!(table.len() <= HIGHSCORE_CAPACITY);
            prop_assert!(table.entries().windows(2).all(|w| w[0].score >= w[1].score));
            let mut best: Vec<u32> = scores.into_iter().filter(|s| *s > 0).collect();
            best.sort_unstable_by(|a, b| b.cmp(a));
            best.truncate(HIGHSCORE_CAPACITY);
            let kept: Vec<u32> = table.entries().iter().map(|e| e.score).collect();
            prop_assert_eq!(kept, best);
        }
    }
}
