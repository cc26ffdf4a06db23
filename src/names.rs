//! Default player names for anonymous scores

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

/// Names handed out when a score arrives without one
pub const DEFAULT_NAMES: [&str; 5] = ["Player1", "Gamer", "Snake King", "Anonymous", "Ace"];

/// Picks default names. Seedable so tests get a fixed sequence.
#[derive(Debug, Clone)]
pub struct NamePicker {
    rng: Pcg32,
}

impl NamePicker {
    pub fn new() -> Self {
        Self {
            rng: Pcg32::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self) -> String {
        DEFAULT_NAMES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(DEFAULT_NAMES[0])
            .to_string()
    }

    /// Use `name` if it has visible content, otherwise pick a default
    pub fn resolve(&mut self, name: Option<&str>) -> String {
        match name {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            _ => self.pick(),
        }
    }
}

impl Default for NamePicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_from_pool() {
        let mut picker = NamePicker::new();
        for _ in 0..50 {
            let name = picker.pick();
            assert!(DEFAULT_NAMES.contains(&name.as_str()));
        }
    }

    #[test]
    fn test_seeded_picker_is_deterministic() {
        let mut a = NamePicker::from_seed(42);
        let mut b = NamePicker::from_seed(42);
        for _ in 0..10 {
            assert_eq!(a.pick(), b.pick());
        }
    }

    #[test]
    fn test_resolve_keeps_given_name() {
        let mut picker = NamePicker::from_seed(1);
        assert_eq!(picker.resolve(Some("Alice")), "Alice");
    }

    #[test]
    fn test_resolve_replaces_blank_name() {
        let mut picker = NamePicker::from_seed(1);
        for name in [None, Some(""), Some("   ")] {
            let resolved = picker.resolve(name);
            assert!(DEFAULT_NAMES.contains(&resolved.as_str()));
        }
    }
}
