// Acts of Faith.
// Resolution is split in two so hosts can ask a human in between: the act
// itself either succeeds, applies failure damage, or hands back the status
// choices; `apply_faith_status` then attaches the one the player picked.

use crate::burden::{BurdenOutcome, apply_burden};
use crate::character::{Attribute, Character, Domain};
use crate::conflict::{LayeredDamage, apply_layered_damage};
use crate::dice::{DiceExpr, DiceRoll, DieSource, roll_expr};
use crate::error::RulesError;
use crate::item::ItemId;
use crate::resources::{BONE_WARD_BONUS, owns_bone_ward};
use crate::settings::Settings;
use crate::status::{StatusRegistry, StatusTemplate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FaithScale {
    Trivial,
    Minor,
    Moderate,
    Major,
    Legendary,
}

impl FaithScale {
    // Reserve the act requires; also the number of d6 taken on failure.
    pub fn reserve(&self) -> i32 {
        match self {
            FaithScale::Trivial => 0,
            FaithScale::Minor => 1,
            FaithScale::Moderate => 2,
            FaithScale::Major => 3,
            FaithScale::Legendary => 4,
        }
    }

    pub fn modifier(&self) -> i32 {
        match self {
            FaithScale::Trivial => 0,
            FaithScale::Minor => -1,
            FaithScale::Moderate => -2,
            FaithScale::Major => -3,
            FaithScale::Legendary => -4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FaithScale::Trivial => "Trivial",
            FaithScale::Minor => "Minor",
            FaithScale::Moderate => "Moderate",
            FaithScale::Major => "Major",
            FaithScale::Legendary => "Legendary",
        }
    }
}

impl FromStr for FaithScale {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trivial" => Ok(FaithScale::Trivial),
            "minor" => Ok(FaithScale::Minor),
            "moderate" => Ok(FaithScale::Moderate),
            "major" => Ok(FaithScale::Major),
            "legendary" => Ok(FaithScale::Legendary),
            _ => Err(RulesError::UnknownFaithScale(s.to_string())),
        }
    }
}

// What a failed act costs. Chosen by world configuration, not by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaithFailurePolicy {
    Damage,
    Status,
}

// Statuses a failed act may attach, with their fallback slot costs.
pub const FAITH_FAILURE_STATUSES: [(&str, i32); 4] = [
    ("Doubt", 0),
    ("Night Terrors", 0),
    ("Spiritual Weight", 1),
    ("Haunted", 0),
];

pub fn check_reserve(character: &Character, scale: FaithScale) -> Result<(), RulesError> {
    let required = scale.reserve();
    let available = character.resources.reserve.value;
    if available < required {
        log::warn!(
            "{} lacks Reserve for a {} act: need {}, have {}",
            character.name,
            scale.label(),
            required,
            available
        );
        return Err(RulesError::InsufficientReserve {
            required,
            available,
        });
    }
    Ok(())
}

pub fn target_number(character: &Character, scale: FaithScale, tap_bonus: i32) -> i32 {
    character.attribute(Attribute::Faith) + scale.modifier() + tap_bonus
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FaithFailure {
    Damage {
        roll: DiceRoll,
        ward_reduction: i32,
        damage: i32,
        layered: LayeredDamage,
        burden: Option<BurdenOutcome>,
    },
    ChooseStatus {
        options: Vec<StatusTemplate>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaithOutcome {
    pub scale: FaithScale,
    pub roll: DiceRoll,
    pub target: i32,
    pub success: bool,
    pub failure: Option<FaithFailure>,
}

// Perform an Act of Faith.
// Fails with `InsufficientReserve` before any die is rolled. Otherwise a
// 1d20 at or under `faith + scale modifier + tap bonus` succeeds. On
// failure the `policy` decides between d6 damage (one die per Reserve tier,
// through Sand then Faith) and a status choice handed back to the host.
pub fn act_of_faith(
    character: &mut Character,
    scale: FaithScale,
    tap_bonus: i32,
    policy: FaithFailurePolicy,
    settings: &Settings,
    dice: &mut dyn DieSource,
    registry: &dyn StatusRegistry,
) -> Result<FaithOutcome, RulesError> {
    check_reserve(character, scale)?;

    let roll = roll_expr(dice, DiceExpr::D20);
    let target = target_number(character, scale, tap_bonus);
    let success = roll.total <= target;
    log::info!(
        "{} Act of Faith ({}): rolled {} vs {}",
        character.name,
        scale.label(),
        roll.total,
        target
    );

    let failure = if success {
        None
    } else {
        Some(match policy {
            FaithFailurePolicy::Damage => {
                faith_failure_damage(character, scale, settings, dice, registry)
            }
            FaithFailurePolicy::Status => FaithFailure::ChooseStatus {
                options: faith_status_options(registry),
            },
        })
    };

    Ok(FaithOutcome {
        scale,
        roll,
        target,
        success,
        failure,
    })
}

fn faith_failure_damage(
    character: &mut Character,
    scale: FaithScale,
    settings: &Settings,
    dice: &mut dyn DieSource,
    registry: &dyn StatusRegistry,
) -> FaithFailure {
    let roll = roll_expr(dice, DiceExpr::new(scale.reserve() as u32, 6));
    let ward_reduction = if settings.bone_ward_mitigation && owns_bone_ward(character, settings) {
        BONE_WARD_BONUS.min(roll.total)
    } else {
        0
    };
    let damage = roll.total - ward_reduction;

    let layered = apply_layered_damage(character, Domain::Faith, damage);
    let burden = layered
        .burden_triggered
        .then(|| apply_burden(character, Domain::Faith, dice, registry));
    character.prepare_derived(settings);

    FaithFailure::Damage {
        roll,
        ward_reduction,
        damage,
        layered,
        burden,
    }
}

// Status choices offered after a failed act, preferring registry definitions.
pub fn faith_status_options(registry: &dyn StatusRegistry) -> Vec<StatusTemplate> {
    FAITH_FAILURE_STATUSES
        .iter()
        .map(|&(name, slots)| {
            registry
                .lookup_status_by_name(name)
                .unwrap_or_else(|| StatusTemplate::new(name, slots, name))
        })
        .collect()
}

// Second phase of a status-policy failure: attach the chosen status as a faith burden.
pub fn apply_faith_status(
    character: &mut Character,
    choice: &str,
    settings: &Settings,
    registry: &dyn StatusRegistry,
) -> Result<ItemId, RulesError> {
    let status = faith_status_options(registry)
        .into_iter()
        .find(|status| status.name.eq_ignore_ascii_case(choice.trim()))
        .ok_or_else(|| RulesError::UnknownStatus(choice.to_string()))?;

    let item = status.to_item(Domain::Faith);
    let id = item.id;
    character.add_item(item);
    character.prepare_derived(settings);
    log::info!("{} takes {} after a failed Act of Faith", character.name, status.name);
    Ok(id)
}
