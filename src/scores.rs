//! Score persistence
//!
//! Per-user personal bests plus a local top-10 leaderboard, persisted to
//! LocalStorage as JSON. Storage being unavailable or corrupt is never an
//! error the player sees: submission still completes, the "new best"
//! celebration just degrades to false.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum number of leaderboard entries to keep
pub const MAX_LEADERBOARD: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    /// Rounded final score
    pub score: u64,
    /// Whole seconds survived
    pub seconds: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Outcome of a score submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Whether this run set a new personal best
    pub new_best: bool,
    /// The best on record before this submission, if known
    pub previous_best: Option<u64>,
}

/// Personal bests keyed by player name, plus the session leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreBoard {
    pub best: BTreeMap<String, u64>,
    pub entries: Vec<ScoreEntry>,
    /// Set when LocalStorage was unavailable or unreadable at load. An
    /// empty board is then indistinguishable from a returning player's, so
    /// the new-best celebration is suppressed rather than fired every run.
    #[serde(skip)]
    degraded: bool,
}

impl ScoreBoard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "drop_dodge_scores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Best score on record for a player
    pub fn personal_best(&self, name: &str) -> Option<u64> {
        self.best.get(name).copied()
    }

    /// Submit a finished run. Only better scores overwrite the personal
    /// best; qualifying scores also enter the leaderboard. On a degraded
    /// board the history is unknown, so `new_best` is always false.
    pub fn submit(&mut self, name: &str, score: u64, seconds: u64, timestamp: f64) -> SubmitOutcome {
        let previous_best = self.personal_best(name);
        let new_best = !self.degraded && previous_best.map_or(score > 0, |b| score > b);

        if new_best {
            self.best.insert(name.to_string(), score);
        }

        if self.qualifies(score) {
            let entry = ScoreEntry {
                name: name.to_string(),
                score,
                seconds,
                timestamp,
            };
            let pos = self
                .entries
                .iter()
                .position(|e| score > e.score)
                .unwrap_or(self.entries.len());
            self.entries.insert(pos, entry);
            self.entries.truncate(MAX_LEADERBOARD);
        }

        SubmitOutcome {
            new_best,
            previous_best,
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_LEADERBOARD {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Board that carries no history because storage could not be read
    #[allow(dead_code)]
    fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    /// Load the score board from LocalStorage (WASM only). Unavailable or
    /// corrupt storage yields a degraded board, not a fresh one.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, score history unknown");
            return Self::degraded();
        };

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<ScoreBoard>(&json) {
                Ok(board) => {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    board
                }
                Err(e) => {
                    log::warn!("Saved scores unreadable: {}", e);
                    Self::degraded()
                }
            },
            Ok(None) => {
                log::info!("No saved scores found, starting fresh");
                Self::new()
            }
            Err(_) => {
                log::warn!("LocalStorage read failed, score history unknown");
                Self::degraded()
            }
        }
    }

    /// Save the score board to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
