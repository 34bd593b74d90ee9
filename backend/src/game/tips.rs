//! Strategy tips pushed to clients after every ply

use rand::seq::IndexedRandom;

pub const STRATEGY_TIPS: [&str; 10] = [
    "Control the center of the board",
    "Develop your pieces early",
    "Castle your king to safety",
    "Connect your rooks",
    "Create pawn chains for protection",
    "Look for tactical opportunities",
    "Protect your king",
    "Create weaknesses in opponent's position",
    "Double your rooks on open files",
    "Activate your knights in the endgame",
];

/// Uniformly random tip; informational only
pub fn random_tip() -> &'static str {
    STRATEGY_TIPS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(STRATEGY_TIPS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_tip_from_fixed_set() {
        for _ in 0..20 {
            assert!(STRATEGY_TIPS.contains(&random_tip()));
        }
    }
}
