//! Keyword-driven reply routing
//!
//! Incoming mention text is matched against an ordered list of keyword
//! groups; the first group whose pattern matches supplies the reply
//! templates. Templates carry placeholders (`{link}`, `{tip}`,
//! `{motivation}`, `{fact}`, `{line}`) that the composer fills at send
//! time. Matching is case-insensitive substring matching, so "helpful"
//! triggers the help group.

use regex::Regex;

/// A single routing rule: name, trigger pattern, reply templates.
pub struct KeywordGroup {
    pub name: &'static str,
    pub pattern: Regex,
    pub replies: &'static [&'static str],
}

impl KeywordGroup {
    fn new(name: &'static str, pattern: &str, replies: &'static [&'static str]) -> Self {
        // Patterns are compile-time literals; a malformed one is a bug,
        // caught by the unit test below rather than at runtime.
        let pattern =
            Regex::new(pattern).unwrap_or_else(|e| unreachable!("invalid keyword pattern: {e}"));
        Self {
            name,
            pattern,
            replies,
        }
    }

    /// Check whether this group's pattern matches a (lowercased or not)
    /// mention body.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Reply templates for mentions that match no keyword group.
pub const DEFAULT_REPLIES: &[&str] = &[
    "{motivation} {link}",
    "{line} {link}",
    "Ready for the ultimate strategy challenge? {link}",
    "{fact} {link}",
    "{taunt} {link}",
];

/// Build the ordered keyword cascade. Order matters: the first matching
/// group wins.
#[must_use]
pub fn default_keyword_groups() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(
            "help",
            r"(?i)(help|how|what is|explain)",
            &[
                "Need help mastering 9D? Start here: {link} 🎮",
                "Questions about 9D TTT? All answers at {link}",
                "Strategy guides await you at {link} - think 9D!",
            ],
        ),
        KeywordGroup::new(
            "play",
            r"(?i)(play|game|start|join)",
            &[
                "Ready to think in 9D? Let's go: {link} 🕹️",
                "Game on! Challenge awaits at {link}",
                "Enter the grid. Prove your strategy: {link}",
            ],
        ),
        KeywordGroup::new(
            "strategy",
            r"(?i)(win|strategy|tips|how to)",
            &[
                "{tip} Play at {link}",
                "Master the dimensions. {tip} {link}",
                "Think ahead. Think 9D. {link} 🎯",
            ],
        ),
        KeywordGroup::new(
            "difficulty",
            r"(?i)(hard|difficult|complex)",
            &[
                "Too hard? That means you're getting smarter! {link} 🧠",
                "Complexity = fun! Keep practicing at {link}",
                "The best challenges make the best players. {link}",
            ],
        ),
        KeywordGroup::new(
            "dimension",
            r"(?i)(dimension|9d|dimensional)",
            &[
                "9 dimensions. Infinite strategy. Experience it: {link}",
                "Dimensional mastery awaits. {link} 🌌",
                "Think beyond 3D. Think 9D: {link}",
            ],
        ),
        KeywordGroup::new(
            "morning",
            r"(?i)(gm|good morning|morning)",
            &[
                "GM! Time to think in 9D! {link} ☀️🎮",
                "Good morning, strategist! Grids are waiting: {link}",
                "Morning! Your brain is fresh. Perfect for 9D: {link}",
            ],
        ),
        KeywordGroup::new(
            "night",
            r"(?i)(gn|good night|night)",
            &[
                "GN! Dream in 9 dimensions! {link} 🌙🎮",
                "Good night! Tomorrow: more 9D strategy at {link}",
                "Rest well, champion. The grid awaits: {link}",
            ],
        ),
    ]
}
