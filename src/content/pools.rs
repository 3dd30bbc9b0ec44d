//! Static phrase pools for composed messages
//!
//! Every outward-facing message is assembled from these tables. Keeping
//! them as `&'static str` slices means the composer can hand out
//! references without allocation and the tables are trivially testable
//! for emptiness and length.

// ============================================================================
// Personality tone lines
// ============================================================================

pub const NEUTRAL: &[&str] = &[
    "Challenge accepted.",
    "Processing move...",
    "Grid updated.",
    "Strategy analyzing...",
    "Next move calculated.",
];

pub const COMPETITIVE: &[&str] = &[
    "Think you can beat me? Let's see.",
    "Your move was... interesting. Not good, but interesting.",
    "I've already calculated your next 5 moves. You lose.",
    "Bold strategy. Let's see if it pays off.",
    "Is that really your best move?",
    "Prepare for defeat.",
    "Victory is mine. It always is.",
    "You call that a strategy?",
];

pub const FRIENDLY: &[&str] = &[
    "Great game! Keep it up!",
    "Nice move! Let's see where this goes.",
    "This is getting interesting!",
    "Well played! Your turn again soon.",
    "Love the competition! Keep going!",
    "Exciting match! Who will win?",
    "Fun game! Let's continue!",
];

pub const GLITCH: &[&str] = &[
    "ERR::GRID OVERFLOW::RECALCULATING...",
    "## DIMENSION BREACH DETECTED ##",
    "...9d...9d...9d...",
    "TEMPORAL PARADOX IMMINENT",
    "X—O—X—error—pattern unstable...",
    "9D::PROTOCOL_MALFUNCTION::ACCESS DENIED",
    "[CORRUPTED] ...dimension... ...9... ...locked...",
];

pub const MYSTICAL: &[&str] = &[
    "In 9 dimensions, all moves are one.",
    "The grid transcends reality...",
    "Your move echoes through dimensional space.",
    "Beyond X and O, there is only strategy.",
    "The multiverse observes your play.",
    "Time is relative. Victory is absolute.",
    "9 dimensions. Infinite possibilities. One winner.",
];

// ============================================================================
// Lore and content pools
// ============================================================================

/// Time-of-day phrases, indexed by [`super::DayPart`].
pub const TIME_MIDNIGHT: &str = "Midnight dimensions. When the best plays happen.";
pub const TIME_MORNING: &str = "Morning grids are loading. Time to think in 9D.";
pub const TIME_AFTERNOON: &str = "Afternoon dimensions aligned. Strategy intensifies.";
pub const TIME_EVENING: &str = "Evening gameplay commencing. Dimensional shifts active.";
pub const TIME_NIGHT: &str = "Night strategies emerging. Perfect for deep thinking.";

pub const GAME_EVENTS: &[&str] = &[
    "New 9D grid initialized. Players entering dimensional space.",
    "Tournament mode activated. Multiple grids in play.",
    "Strategy analysis complete. Patterns detected.",
    "Dimensional cascade triggered. All grids affected.",
    "Player rankings updated. Leaderboard shifting.",
    "Advanced tactics deployed. 4D chess? Try 9D tic-tac-toe.",
    "Grid complexity increasing. Can you keep up?",
    "New challenge issued. Prove your dimensional mastery.",
    "Multiple victories detected. Champions rising.",
    "Strategic depth unprecedented. This is next-level gaming.",
];

pub const STRATEGY_TIPS: &[&str] = &[
    "Pro tip: Think 3 moves ahead in each dimension.",
    "Master one dimension first, then expand your strategy.",
    "Corner control in 9D space = victory foundation.",
    "Never underestimate parallel dimension tactics.",
    "Pattern recognition is your greatest weapon.",
    "The center cube controls all dimensions. Claim it.",
    "Balance offense and defense across all 9 layers.",
    "Watch for dimensional cascade opportunities.",
    "Your opponent thinks in 3D. You think in 9D. Advantage: yours.",
];

pub const GAME_FACTS: &[&str] = &[
    "9D Tic-Tac-Toe: Where strategy transcends reality.",
    "Not just a game. A dimensional challenge.",
    "3 dimensions? Too easy. Try 9.",
    "Your brain's new workout routine: 9D TTT.",
    "Chess players are intimidated. Go players are impressed.",
    "Warning: May cause spontaneous strategic enlightenment.",
    "The game that makes quantum physics look simple.",
    "Tic-tac-toe evolved. Your move.",
];

pub const PLAYER_ACHIEVEMENTS: &[&str] = &[
    "Dimensional Master: Controlled 5+ grids simultaneously.",
    "Strategic Genius: Won with perfect pattern formation.",
    "Grid Dominator: Swept all 9 dimensions.",
    "Quantum Player: Made moves that defied logic but won.",
    "Pattern Prophet: Predicted opponent moves 5 turns ahead.",
    "Cascade Champion: Triggered 3+ dimensional cascades.",
    "Multi-Grid Warrior: Won 3 games at once.",
];

pub const MOTIVATIONAL: &[&str] = &[
    "Think bigger. Think 9D.",
    "Your next move could change everything.",
    "Strategy is the ultimate power.",
    "In 9D space, you make the rules.",
    "Every dimension is an opportunity.",
    "Master the grid. Master the game.",
    "Champions aren't born in 3D. They're forged in 9D.",
    "Your brain is ready. The grid is waiting.",
    "Play smart. Play 9D.",
    "The ultimate test of strategic thinking awaits.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pool_is_empty() {
        for pool in [
            NEUTRAL,
            COMPETITIVE,
            FRIENDLY,
            GLITCH,
            MYSTICAL,
            GAME_EVENTS,
            STRATEGY_TIPS,
            GAME_FACTS,
            PLAYER_ACHIEVEMENTS,
            MOTIVATIONAL,
        ] {
            assert!(!pool.is_empty());
        }
    }

    #[test]
    fn test_pool_lines_are_short() {
        // Every single line must leave room for headers plus the link.
        for pool in [GAME_EVENTS, STRATEGY_TIPS, GAME_FACTS, PLAYER_ACHIEVEMENTS, MOTIVATIONAL] {
            for line in pool {
                assert!(line.chars().count() < 120, "overlong pool line: {line}");
            }
        }
    }
}
