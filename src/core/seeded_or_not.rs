use serde::{Serialize, Deserialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeededOrNot {
    Seeded(u64),
    #[default]
    Unseeded,
}

impl SeededOrNot {
    /// Unseeded sessions take a fresh seed from the system clock.
    pub fn resolve(&self) -> u64 {
        match self {
            SeededOrNot::Seeded(seed) => *seed,
            SeededOrNot::Unseeded => {
                let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
                now.as_nanos() as u64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_resolves_to_its_value() {
        assert_eq!(SeededOrNot::Seeded(132).resolve(), 132);
    }
}
