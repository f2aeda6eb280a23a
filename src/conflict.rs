// Conflict resolution shared by physical, social and faith damage.
// One die is rolled per attack. Each target then mitigates it with the
// armor relevant to the domain and soaks the rest in Sand before the
// domain's primary attribute takes the overflow. Driving Sand from above
// zero to exactly zero rolls a burden for that target.

use crate::burden::{BurdenOutcome, apply_burden};
use crate::character::{Character, CharacterId, Domain};
use crate::dice::{DiceExpr, DiceRoll, DieSource, roll_expr};
use crate::error::RulesError;
use crate::item::Weapon;
use crate::resources::{physical_armor, social_armor};
use crate::settings::Settings;
use crate::status::StatusRegistry;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_FORMULA: &str = "1d6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackOptions {
    pub base_formula: String,
    pub advantage: bool,
    pub disadvantage: bool,
    pub unarmed: bool,
    pub is_gun: bool, // Guns ignore physical armor.
    pub aoe: bool,    // Every target takes the same roll, allies included.
    pub tap_bonus: i32,
}

impl Default for AttackOptions {
    fn default() -> Self {
        AttackOptions {
            base_formula: DEFAULT_BASE_FORMULA.to_string(),
            advantage: false,
            disadvantage: false,
            unarmed: false,
            is_gun: false,
            aoe: false,
            tap_bonus: 0,
        }
    }
}

impl AttackOptions {
    // Options pre-filled from a weapon's damage and properties.
    pub fn with_weapon(weapon: &Weapon) -> Self {
        AttackOptions {
            base_formula: weapon.damage.clone(),
            is_gun: weapon.properties.is_gun,
            aoe: weapon.properties.aoe,
            ..Default::default()
        }
    }

    pub fn unarmed() -> Self {
        AttackOptions {
            unarmed: true,
            ..Default::default()
        }
    }
}

// Advantage wins over everything; disadvantage or bare hands drop to a d4.
pub fn choose_damage_formula(options: &AttackOptions) -> Result<DiceExpr, RulesError> {
    if options.advantage {
        return Ok(DiceExpr::D12);
    }
    if options.disadvantage || options.unarmed {
        return Ok(DiceExpr::D4);
    }
    if options.base_formula.trim().is_empty() {
        return Ok(DiceExpr::D4);
    }
    options.base_formula.parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayeredDamage {
    pub sand_before: i32,
    pub sand_after: i32,
    pub applied_to_sand: i32,
    pub overflow: i32,
    pub attribute_loss: i32, // What the attribute actually lost after the floor at zero.
    pub burden_triggered: bool,
}

// Drain Sand first, then the domain's primary attribute.
// Neither value goes below zero. The burden flag is a rising edge: it is
// only set when this hit takes Sand from a positive value to zero.
pub fn apply_layered_damage(character: &mut Character, domain: Domain, damage: i32) -> LayeredDamage {
    let damage = damage.max(0);
    let sand_before = character.resources.sand.value.max(0);
    let applied_to_sand = sand_before.min(damage);
    let sand_after = sand_before - applied_to_sand;
    character.resources.sand.value = sand_after;

    let overflow = damage - applied_to_sand;
    let attribute = character.attributes.get_mut(domain.primary_attribute());
    let before = *attribute;
    if overflow > 0 {
        *attribute = (before - overflow).max(0);
    }
    let attribute_loss = (before - *attribute).max(0);

    LayeredDamage {
        sand_before,
        sand_after,
        applied_to_sand,
        overflow,
        attribute_loss,
        burden_triggered: sand_before > 0 && sand_after == 0,
    }
}

// Armor a target brings against this domain.
pub fn mitigation_for(
    target: &Character,
    domain: Domain,
    options: &AttackOptions,
    settings: &Settings,
) -> i32 {
    match domain {
        Domain::Physical if options.is_gun => 0,
        Domain::Physical => physical_armor(target),
        Domain::Social => social_armor(target, settings),
        Domain::Faith => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    pub target: CharacterId,
    pub name: String,
    pub armor: i32,
    pub absorbed: i32, // Portion of the damage the armor actually stopped.
    pub mitigated: i32,
    #[serde(flatten)]
    pub layered: LayeredDamage,
    pub burden: Option<BurdenOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictResult {
    pub attacker: CharacterId,
    pub domain: Domain,
    pub roll: DiceRoll,
    pub tap_bonus: i32,
    pub damage: i32, // Raw damage every target starts from.
    pub targets: Vec<TargetOutcome>,
}

// Resolve one attack.
// A non-AoE attack hits only the first target and needs one; an AoE attack
// hits every target with the same damage, including the attacker's allies.
// Validation happens before the roll, so a failed call changes nothing.
pub fn resolve_conflict(
    attacker: CharacterId,
    domain: Domain,
    options: &AttackOptions,
    targets: &mut [Character],
    settings: &Settings,
    dice: &mut dyn DieSource,
    registry: &dyn StatusRegistry,
) -> Result<ConflictResult, RulesError> {
    if targets.is_empty() && !options.aoe {
        return Err(RulesError::InsufficientTarget);
    }
    let expr = choose_damage_formula(options)?;

    let roll = roll_expr(dice, expr);
    let damage = (roll.total + options.tap_bonus).max(0);
    let hit = if options.aoe {
        targets
    } else {
        &mut targets[..1]
    };

    let mut outcomes = Vec::with_capacity(hit.len());
    for target in hit.iter_mut() {
        let armor = mitigation_for(target, domain, options, settings);
        let absorbed = armor.clamp(0, damage);
        let mitigated = damage - absorbed;

        let layered = apply_layered_damage(target, domain, mitigated);
        let burden = layered
            .burden_triggered
            .then(|| apply_burden(target, domain, dice, registry));
        target.prepare_derived(settings);

        log::info!(
            "{} {} damage to {}: {} (armor {}), sand {} -> {}, overflow {}",
            domain,
            expr,
            target.name,
            mitigated,
            absorbed,
            layered.sand_before,
            layered.sand_after,
            layered.overflow
        );
        outcomes.push(TargetOutcome {
            target: target.id,
            name: target.name.clone(),
            armor,
            absorbed,
            mitigated,
            layered,
            burden,
        });
    }

    Ok(ConflictResult {
        attacker,
        domain,
        roll,
        tap_bonus: options.tap_bonus,
        damage,
        targets: outcomes,
    })
}

pub fn physical_attack(
    attacker: CharacterId,
    options: &AttackOptions,
    targets: &mut [Character],
    settings: &Settings,
    dice: &mut dyn DieSource,
    registry: &dyn StatusRegistry,
) -> Result<ConflictResult, RulesError> {
    resolve_conflict(attacker, Domain::Physical, options, targets, settings, dice, registry)
}

pub fn social_attack(
    attacker: CharacterId,
    options: &AttackOptions,
    targets: &mut [Character],
    settings: &Settings,
    dice: &mut dyn DieSource,
    registry: &dyn StatusRegistry,
) -> Result<ConflictResult, RulesError> {
    resolve_conflict(attacker, Domain::Social, options, targets, settings, dice, registry)
}
