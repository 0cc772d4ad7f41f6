//! High score leaderboard system
//!
//! Persisted as JSON, tracks the top 10 runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Pillars reached
    pub landings: u32,
    /// Distance walked
    pub distance: f32,
    /// Unix timestamp (s) when achieved
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_run(&mut self, score: u64, landings: u32, distance: f32, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            landings,
            distance,
            timestamp,
        };

        // Sorted descending by score, ties keep the older run first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a JSON file
    pub fn try_load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut scores: HighScores = serde_json::from_str(&json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    /// Load high scores, starting fresh if the file is missing or bad
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) => {
                log::info!("No high scores found, starting fresh ({})", err);
                Self::new()
            }
        }
    }

    /// Save high scores as JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_run(300, 3, 900.0, 1), Some(1));
        assert_eq!(scores.add_run(500, 5, 1500.0, 2), Some(1));
        assert_eq!(scores.add_run(100, 1, 300.0, 3), Some(3));
        assert_eq!(scores.top_score(), Some(500));
        assert_eq!(scores.potential_rank(400), Some(2));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_run(0, 0, 0.0, 1), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_full_board_truncates() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_run(i * 100, i as u32, 0.0, i);
        }
        assert!(!scores.qualifies(50));
        assert_eq!(scores.add_run(2000, 20, 0.0, 99), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(200));
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let scores = HighScores::load(Path::new("/nonexistent/monkey-drop-scores.json"));
        assert!(scores.is_empty());
    }
}
