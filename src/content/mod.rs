//! Message composition
//!
//! The [`Composer`] turns phrase pools, tone selection, and event text
//! into complete outbound messages. Its central invariant: no composed
//! message ever exceeds the platform character limit, and the promoted
//! link survives every truncation. When a message overflows, the
//! composer abandons decorations and rebuilds from a truncated body
//! plus the link rather than chopping blindly from the end.

pub mod keywords;
pub mod pools;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::PersonaConfig;
use keywords::{default_keyword_groups, KeywordGroup, DEFAULT_REPLIES};

// ============================================================================
// Tone selection
// ============================================================================

/// Personality tone of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Glitch,
    Mystical,
    Competitive,
    Friendly,
    Neutral,
}

impl Tone {
    /// The phrase pool backing this tone.
    #[must_use]
    pub fn pool(self) -> &'static [&'static str] {
        match self {
            Tone::Glitch => pools::GLITCH,
            Tone::Mystical => pools::MYSTICAL,
            Tone::Competitive => pools::COMPETITIVE,
            Tone::Friendly => pools::FRIENDLY,
            Tone::Neutral => pools::NEUTRAL,
        }
    }
}

/// Cumulative thresholds mapping a uniform roll in `[0, 1)` to a tone.
///
/// The defaults give glitch 5%, mystical 10%, competitive 25%,
/// friendly 20%, and neutral the remaining 40%.
#[derive(Debug, Clone, Copy)]
pub struct ToneWeights {
    pub glitch: f64,
    pub mystical: f64,
    pub competitive: f64,
    pub friendly: f64,
}

impl Default for ToneWeights {
    fn default() -> Self {
        Self {
            glitch: 0.05,
            mystical: 0.15,
            competitive: 0.40,
            friendly: 0.60,
        }
    }
}

impl ToneWeights {
    /// Map a roll to a tone by walking the cumulative thresholds.
    #[must_use]
    pub fn pick(&self, roll: f64) -> Tone {
        if roll < self.glitch {
            Tone::Glitch
        } else if roll < self.mystical {
            Tone::Mystical
        } else if roll < self.competitive {
            Tone::Competitive
        } else if roll < self.friendly {
            Tone::Friendly
        } else {
            Tone::Neutral
        }
    }
}

// ============================================================================
// Broadcast archetypes
// ============================================================================

/// The six broadcast message shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastKind {
    GameUpdate,
    StrategyTip,
    GameFact,
    AchievementShowcase,
    Motivational,
    EventAlert,
}

impl BroadcastKind {
    pub const ALL: [BroadcastKind; 6] = [
        BroadcastKind::GameUpdate,
        BroadcastKind::StrategyTip,
        BroadcastKind::GameFact,
        BroadcastKind::AchievementShowcase,
        BroadcastKind::Motivational,
        BroadcastKind::EventAlert,
    ];

    /// Short label used in logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BroadcastKind::GameUpdate => "game_update",
            BroadcastKind::StrategyTip => "strategy_tip",
            BroadcastKind::GameFact => "game_fact",
            BroadcastKind::AchievementShowcase => "achievement_showcase",
            BroadcastKind::Motivational => "motivational",
            BroadcastKind::EventAlert => "event_alert",
        }
    }
}

// ============================================================================
// Time-of-day phrasing
// ============================================================================

/// Coarse day segments for the status broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    Midnight,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    /// Classify a local hour (0-23).
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=4 => DayPart::Midnight,
            5..=11 => DayPart::Morning,
            12..=16 => DayPart::Afternoon,
            17..=20 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    #[must_use]
    pub fn phrase(self) -> &'static str {
        match self {
            DayPart::Midnight => pools::TIME_MIDNIGHT,
            DayPart::Morning => pools::TIME_MORNING,
            DayPart::Afternoon => pools::TIME_AFTERNOON,
            DayPart::Evening => pools::TIME_EVENING,
            DayPart::Night => pools::TIME_NIGHT,
        }
    }
}

// ============================================================================
// Composer
// ============================================================================

/// Parts of an update message before assembly.
#[derive(Debug, Clone)]
pub struct MessageParts {
    /// Core body text (event description, tip, etc.)
    pub body: String,
    /// Personality flair line appended after the body
    pub flair: String,
}

/// Assembles outbound messages from pools and templates.
pub struct Composer {
    persona: PersonaConfig,
    weights: ToneWeights,
    keyword_groups: Vec<KeywordGroup>,
}

impl Composer {
    #[must_use]
    pub fn new(persona: PersonaConfig) -> Self {
        Self {
            persona,
            weights: ToneWeights::default(),
            keyword_groups: default_keyword_groups(),
        }
    }

    #[must_use]
    pub fn persona(&self) -> &PersonaConfig {
        &self.persona
    }

    /// Pick a tone from a uniform roll.
    #[must_use]
    pub fn pick_tone(&self, roll: f64) -> Tone {
        self.weights.pick(roll)
    }

    /// Draw a random personality line across the weighted tones.
    pub fn personality_line(&self, rng: &mut impl Rng) -> &'static str {
        let tone = self.pick_tone(rng.gen::<f64>());
        choose(tone.pool(), rng)
    }

    /// Compose a full update message, enforcing the character limit.
    ///
    /// The happy path decorates the body with the bot-name header, the
    /// flair line, and the link. On overflow the decorations are dropped
    /// and the body itself is cut so the link always survives intact.
    #[must_use]
    pub fn compose(&self, parts: &MessageParts) -> String {
        let full = format!(
            "🎮 {} UPDATE 🎮\n\n{}\n\n{}\n\n{}",
            self.persona.bot_name, parts.body, parts.flair, self.persona.link
        );
        self.fit_or_rebuild(full, &parts.body)
    }

    /// Compose a reply to a mention.
    ///
    /// `template` comes from a keyword group or the default pool and may
    /// carry placeholders. The handle prefix and the link are never
    /// truncated; on overflow the reply is rebuilt from a cut
    /// personality line instead.
    #[must_use]
    pub fn compose_reply(&self, handle: &str, template: &str, rng: &mut impl Rng) -> String {
        let body = self.render_template(template, rng);
        let reply = format!("@{handle} {body}");
        if reply.chars().count() <= self.persona.char_limit {
            return reply;
        }

        let reserved = format!("@{handle} \n\n{}", self.persona.link);
        let budget = self
            .persona
            .char_limit
            .saturating_sub(reserved.chars().count());
        let line: String = self.personality_line(rng).chars().take(budget).collect();
        format!("@{handle} {line}\n\n{}", self.persona.link)
    }

    /// Select a reply template from the keyword cascade: the first
    /// matching group wins; `None` when no group matches.
    pub fn keyword_template(&self, message: &str, rng: &mut impl Rng) -> Option<&'static str> {
        self.keyword_groups
            .iter()
            .find(|group| group.matches(message))
            .map(|group| choose(group.replies, rng))
    }

    /// Draw a reply template for mentions that matched no keyword.
    pub fn default_template(&self, rng: &mut impl Rng) -> &'static str {
        choose(DEFAULT_REPLIES, rng)
    }

    /// Select a reply template for a mention body: first matching
    /// keyword group wins, otherwise a default template.
    pub fn reply_template(&self, message: &str, rng: &mut impl Rng) -> &'static str {
        self.keyword_template(message, rng)
            .unwrap_or_else(|| self.default_template(rng))
    }

    /// Fill template placeholders with drawn pool content.
    #[must_use]
    pub fn render_template(&self, template: &str, rng: &mut impl Rng) -> String {
        let mut out = template.replace("{link}", &self.persona.link);
        if out.contains("{tip}") {
            out = out.replace("{tip}", choose(pools::STRATEGY_TIPS, rng));
        }
        if out.contains("{motivation}") {
            out = out.replace("{motivation}", choose(pools::MOTIVATIONAL, rng));
        }
        if out.contains("{fact}") {
            out = out.replace("{fact}", choose(pools::GAME_FACTS, rng));
        }
        if out.contains("{line}") {
            let line = self.personality_line(rng);
            out = out.replace("{line}", line);
        }
        if out.contains("{taunt}") {
            out = out.replace("{taunt}", choose(pools::COMPETITIVE, rng));
        }
        out
    }

    /// Draft a broadcast of the given archetype.
    #[must_use]
    pub fn draft_broadcast(
        &self,
        kind: BroadcastKind,
        local_hour: u32,
        rng: &mut impl Rng,
    ) -> String {
        let link = &self.persona.link;
        let message = match kind {
            BroadcastKind::GameUpdate => format!(
                "🎮 9DTTT STATUS 🎮\n\n📊 {}\n\n⚡ {}\n\n{}\n\n🕹️ {link}",
                DayPart::from_hour(local_hour).phrase(),
                choose(pools::GAME_EVENTS, rng),
                choose(pools::MOTIVATIONAL, rng),
            ),
            BroadcastKind::StrategyTip => format!(
                "💡 STRATEGY TIP 💡\n\n{}\n\n{}\n\nMaster the grid: {link}",
                choose(pools::STRATEGY_TIPS, rng),
                self.personality_line(rng),
            ),
            BroadcastKind::GameFact => format!(
                "🎯 DID YOU KNOW? 🎯\n\n{}\n\n{}\n\n🕹️ {link}",
                choose(pools::GAME_FACTS, rng),
                choose(pools::MOTIVATIONAL, rng),
            ),
            BroadcastKind::AchievementShowcase => format!(
                "🏆 ACHIEVEMENT SPOTLIGHT 🏆\n\n{}\n\nCan you earn this? Challenge yourself!\n\n🎮 {link}",
                choose(pools::PLAYER_ACHIEVEMENTS, rng),
            ),
            BroadcastKind::Motivational => format!(
                "🚀 DAILY CHALLENGE 🚀\n\n{}\n\n{}\n\nPlay now: {link}",
                choose(pools::MOTIVATIONAL, rng),
                choose(pools::GAME_EVENTS, rng),
            ),
            BroadcastKind::EventAlert => format!(
                "🔔 GAME ALERT 🔔\n\n{}\n\n{}\n\nJoin the action: {link}",
                choose(pools::GAME_EVENTS, rng),
                self.personality_line(rng),
            ),
        };

        // Overflow handling swaps in a fresh event line as the fallback
        // body, matching the rebuilt-update shape.
        let fallback = choose(pools::GAME_EVENTS, rng).to_string();
        self.fit_or_rebuild(message, &fallback)
    }

    /// Draft the daily diagnostic status message.
    #[must_use]
    pub fn draft_diagnostic(&self, rng: &mut impl Rng) -> String {
        let diag = format!(
            "🎮 9DTTT DIAGNOSTIC 🎮\n\nSystem Status: ONLINE\nGrid Status: ACTIVE\nDimensions: ALL 9 OPERATIONAL\n\n{}\n\n🕹️ {}",
            choose(pools::MOTIVATIONAL, rng),
            self.persona.link,
        );
        diag.chars().take(self.persona.char_limit).collect()
    }

    /// Draft the one-shot activation announcement.
    #[must_use]
    pub fn draft_activation(&self, rng: &mut impl Rng) -> String {
        let name = &self.persona.bot_name;
        let link = &self.persona.link;
        let candidates = [
            format!(
                "🎮 {name} ACTIVATED 🎮\n\n9-dimensional grid online.\nStrategy systems operational.\nReady to challenge your mind?\n\n{}\n\n🕹️ {link}",
                choose(pools::MOTIVATIONAL, rng),
            ),
            format!(
                "🔌 SYSTEM BOOT COMPLETE 🔌\n\n{name} online.\nAll 9 dimensions loaded.\nGrid ready for strategic combat.\n\n{}\n\n🎮 {link}",
                self.personality_line(rng),
            ),
            format!(
                "📡 GRID INITIALIZED 📡\n\n9D Tic-Tac-Toe system active.\nPlayers welcome. Strategies encouraged.\nVictory awaits the bold.\n\n{}\n\n🕹️ {link}",
                choose(pools::MOTIVATIONAL, rng),
            ),
        ];
        let picked = candidates[rng.gen_range(0..candidates.len())].clone();
        if picked.chars().count() <= self.persona.char_limit {
            return picked;
        }

        let skeleton = format!("🎮 {name} ONLINE 🎮\n\n9D Grid Active\n\n\n🕹️ {link}");
        let budget = self
            .persona
            .char_limit
            .saturating_sub(skeleton.chars().count());
        let motivation: String = choose(pools::MOTIVATIONAL, rng).chars().take(budget).collect();
        format!("🎮 {name} ONLINE 🎮\n\n9D Grid Active\n{motivation}\n\n🕹️ {link}")
    }

    /// Enforce the character limit: keep `full` if it fits, otherwise
    /// rebuild as marker + truncated body + link.
    fn fit_or_rebuild(&self, full: String, body: &str) -> String {
        if full.chars().count() <= self.persona.char_limit {
            return full;
        }
        let reserved = format!("🎮 \n\n{}", self.persona.link);
        let budget = self
            .persona
            .char_limit
            .saturating_sub(reserved.chars().count());
        let truncated: String = body.chars().take(budget).collect();
        format!("🎮 {truncated}\n\n{}", self.persona.link)
    }
}

/// Uniform draw from a non-empty static slice.
fn choose(pool: &'static [&'static str], rng: &mut impl Rng) -> &'static str {
    pool.choose(rng).copied().unwrap_or("")
}
