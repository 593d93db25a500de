//! Statistics tracking for a session.

use serde::{Deserialize, Serialize};

/// Running counters for one session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Ticks simulated so far
    pub time: u64,
    /// Pellets eaten by the player
    pub pellets_eaten: usize,
    /// Pellets still on the board
    pub pellets_remaining: usize,
    pub score: u64,
    /// Genome replacements across all obstacles
    pub evolutions: u64,
    /// Obstacle genes that ran into a wall
    pub blocked_moves: u64,
    /// Times the player was halted in front of a wall
    pub player_stops: u64,
    /// Closest obstacle distance to the player this tick, in pixels
    pub nearest_obstacle: Option<f64>,
}

impl Stats {
    /// One-line progress summary
    pub fn summary(&self) -> String {
        let nearest = self
            .nearest_obstacle
            .map_or_else(|| "-".to_string(), |d| format!("{:.1}px", d));
        format!(
            "t={:>6} | score {:>5} | pellets {:>4} left | evolutions {:>4} | blocked {:>5} | nearest {}",
            self.time, self.score, self.pellets_remaining, self.evolutions, self.blocked_moves, nearest
        )
    }

    /// Save stats to JSON file
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Load stats from JSON file
    pub fn load_json(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Periodic stats snapshots
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    pub snapshots: Vec<Stats>,
    pub interval: u64,
}

impl StatsHistory {
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// Record a snapshot if `stats.time` falls on the interval
    pub fn maybe_record(&mut self, stats: &Stats) {
        if self.interval > 0 && stats.time % self.interval == 0 {
            self.snapshots.push(stats.clone());
        }
    }

    pub fn score_series(&self) -> Vec<(u64, u64)> {
        self.snapshots.iter().map(|s| (s.time, s.score)).collect()
    }

    pub fn pellet_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.pellets_remaining)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_interval() {
        let mut history = StatsHistory::new(10);
        for t in 1..=35 {
            let stats = Stats {
                time: t,
                score: t * 10,
                ..Default::default()
            };
            history.maybe_record(&stats);
        }
        assert_eq!(history.snapshots.len(), 3);
        assert_eq!(history.score_series(), vec![(10, 100), (20, 200), (30, 300)]);
        assert_eq!(history.pellet_series(), vec![(10, 0), (20, 0), (30, 0)]);
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let path = path.to_str().unwrap();

        let stats = Stats {
            time: 42,
            pellets_eaten: 7,
            score: 70,
            ..Default::default()
        };
        stats.save_json(path).unwrap();
        assert_eq!(Stats::load_json(path).unwrap(), stats);
    }

    #[test]
    fn test_summary_mentions_score() {
        let stats = Stats {
            score: 120,
            ..Default::default()
        };
        assert!(stats.summary().contains("score   120"));
    }
}
