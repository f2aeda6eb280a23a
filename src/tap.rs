// Characteristic taps, the cooldown rule and rank advancement.
// A characteristic cannot be tapped again until two *different* other
// characteristics have been tapped since its last use. The tap history is
// the only input to that rule.

use crate::character::Character;
use crate::dice::{DiceExpr, DieSource, roll_expr};
use crate::error::RulesError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_RANK: u32 = 10;
const DISTINCT_TAPS_TO_CLEAR: usize = 2;

pub fn is_disabled(name: &str, history: &[String]) -> bool {
    let Some(last) = history.iter().rposition(|tapped| tapped == name) else {
        return false;
    };
    let others: HashSet<&str> = history[last + 1..].iter().map(String::as_str).collect();
    others.len() < DISTINCT_TAPS_TO_CLEAR
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapOutcome {
    pub characteristic: String,
    pub bonus: i32, // Equal to the characteristic's rank.
    pub new_uses: u32,
    pub can_advance_now: bool,
}

pub fn tap(
    character: &mut Character,
    name: &str,
    history_limit: usize,
) -> Result<TapOutcome, RulesError> {
    // Validate before touching anything.
    character.characteristic(name)?;
    if is_disabled(name, &character.tap_tracking.tap_history) {
        log::warn!("{} tried to tap {} during its cooldown", character.name, name);
        return Err(RulesError::CooldownViolation {
            characteristic: name.to_string(),
        });
    }

    let characteristic = character.characteristic_mut(name)?;
    characteristic.uses += 1;
    let outcome = TapOutcome {
        characteristic: name.to_string(),
        bonus: characteristic.rank as i32,
        new_uses: characteristic.uses,
        can_advance_now: characteristic.uses >= characteristic.required_uses(),
    };

    let tracking = &mut character.tap_tracking;
    tracking.tap_history.push(name.to_string());
    let overflow = tracking.tap_history.len().saturating_sub(history_limit);
    tracking.tap_history.drain(..overflow);
    tracking.last_tapped_char = Some(name.to_string());
    tracking.global_tap_counter += 1;

    refresh_flags(character);
    log::info!(
        "{} tapped {} (+{}, {} uses)",
        character.name,
        name,
        outcome.bonus,
        outcome.new_uses
    );
    Ok(outcome)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    NotReady { uses: u32, required: u32 },
    MaxRank { rank: u32 },
    Rolled {
        roll: u32,
        success: bool,
        old_rank: u32,
        new_rank: u32,
    },
}

// Try to raise a characteristic's rank.
// Needs `uses >= rank * 10` and a rank below ten; otherwise nothing changes
// and an informational outcome is returned. A 1d6 above the current rank
// succeeds. Either way the attempt consumes every accumulated use.
pub fn attempt_advance(
    character: &mut Character,
    name: &str,
    dice: &mut dyn DieSource,
) -> Result<AdvanceOutcome, RulesError> {
    let characteristic = character.characteristic_mut(name)?;
    if characteristic.uses < characteristic.required_uses() {
        return Ok(AdvanceOutcome::NotReady {
            uses: characteristic.uses,
            required: characteristic.required_uses(),
        });
    }
    if characteristic.rank >= MAX_RANK {
        return Ok(AdvanceOutcome::MaxRank {
            rank: characteristic.rank,
        });
    }

    let roll = roll_expr(dice, DiceExpr::D6).total as u32;
    let old_rank = characteristic.rank;
    let success = roll > old_rank;
    if success {
        characteristic.rank += 1;
    }
    characteristic.uses = 0;
    let new_rank = characteristic.rank;

    refresh_flags(character);
    log::info!(
        "{} advancement of {}: rolled {} vs rank {} ({})",
        character.name,
        name,
        roll,
        old_rank,
        if success { "advanced" } else { "failed" }
    );
    Ok(AdvanceOutcome::Rolled {
        roll,
        success,
        old_rank,
        new_rank,
    })
}

// Rewrite the cached `is_disabled` and `can_advance` flags from current state.
pub fn refresh_flags(character: &mut Character) {
    let history = &character.tap_tracking.tap_history;
    for (name, characteristic) in character.characteristics.iter_mut() {
        characteristic.is_disabled = is_disabled(name, history);
        characteristic.can_advance = characteristic.uses >= characteristic.required_uses();
    }
}

// Characteristics that may be tapped right now, in name order.
pub fn available(character: &Character) -> Vec<&str> {
    character
        .characteristics
        .keys()
        .filter(|name| !is_disabled(name, &character.tap_tracking.tap_history))
        .map(String::as_str)
        .collect()
}
