//! Scene statistics for logs and window titles.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::components::Species;

/// Snapshot of a running scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneStats {
    pub tick: u64,
    pub time: f32,
    pub agents: usize,
    pub species: BTreeMap<Species, usize>,
    pub bubbles: usize,
    pub burst_bubbles: usize,
    pub emitters: usize,
    /// Emitters still releasing bubbles
    pub active_emitters: usize,
    pub marine_snow: usize,
    pub decor: usize,
    /// Night amount, 0 at noon
    pub night: f32,
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} t={:.2}s | {} agents", self.tick, self.time, self.agents)?;
        if !self.species.is_empty() {
            let parts: Vec<String> = self
                .species
                .iter()
                .map(|(species, n)| format!("{}:{}", species, n))
                .collect();
            write!(f, " ({})", parts.join(" "))?;
        }
        write!(
            f,
            " | bubbles {}+{} from {} emitters ({} active) | snow {} | night {:.0}%",
            self.bubbles,
            self.burst_bubbles,
            self.emitters,
            self.active_emitters,
            self.marine_snow,
            self.night * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_species() {
        let mut stats = SceneStats {
            tick: 10,
            agents: 3,
            ..Default::default()
        };
        stats.species.insert(Species::Swimmer, 2);
        stats.species.insert(Species::Crawler, 1);
        let line = stats.to_string();
        assert!(line.contains("3 agents (swimmer:2 crawler:1)"));
        assert!(line.starts_with("tick 10"));
    }

    #[test]
    fn test_serializes_to_json() {
        let stats = SceneStats::default();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["agents"], 0);
    }
}
