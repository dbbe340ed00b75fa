//! Prompt-string construction for generation calls.
//!
//! Glue, not engineering: the persona context stitches a soul's identity
//! together with the collective's recent memories so contestants react to
//! the tournament as it stands.

use crate::domain::models::{CollectiveState, Soul};

/// How many narrative entries feed each persona context.
const RECENT_MEMORIES: usize = 8;

/// Build the system context for one contestant's generation call.
pub fn persona_context(soul: &Soul, collective: &CollectiveState) -> String {
    let memories = collective.recent_essence(RECENT_MEMORIES);
    let memories = if memories.is_empty() {
        "The arena is still quiet.".to_string()
    } else {
        memories.join("\n")
    };

    format!(
        "You are {name}, a contestant in an elimination arena.\n\
         Your trait: {trait_line}\n\
         Your story so far: {essence}\n\
         Eliminations you have scored: {kills}\n\n\
         The collective has absorbed {absorbed} souls across {generation} generation(s).\n\
         Recent arena memories (oldest first):\n{memories}\n\n\
         Speak entirely in character. Short, vicious, quotable. Losing means \
         being absorbed into the collective forever.",
        name = soul.name,
        trait_line = soul.trait_line,
        essence = soul.essence,
        kills = soul.kills,
        absorbed = collective.souls_absorbed,
        generation = collective.current_generation,
    )
}

/// Short opponent descriptor handed to the other side of the match.
pub fn opponent_descriptor(soul: &Soul) -> String {
    format!("{} ({})", soul.name, soul.trait_line)
}
