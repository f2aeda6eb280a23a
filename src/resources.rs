// Derived resources: Inventory, Load, Reserve, the Sand clamp and armor totals.
// Derivation only ever writes derived fields, so running it twice in a row
// gives the same character as running it once.

use crate::character::Character;
use crate::item::{ArmorDomain, ItemKind};
use crate::settings::Settings;

pub const MIN_INVENTORY: i32 = 10;
pub const BONE_WARD_NAME: &str = "bone-ward fetish";
pub const BONE_WARD_BONUS: i32 = 1;

pub fn derive_resources(character: &mut Character, settings: &Settings) {
    let inventory = character.attributes.vigor.max(MIN_INVENTORY);
    let load = load(character);
    let social_armor = social_armor(character, settings);

    let resources = &mut character.resources;
    resources.inventory = inventory;
    resources.load = load;
    resources.reserve.value = inventory - load;
    resources.reserve.max = inventory;

    // Clamp down only; Sand is never topped up here.
    let sand = &mut resources.sand;
    sand.value = sand.value.min(sand.max).max(0);

    resources.social_armor = social_armor;
}

// Total slot cost of everything the character carries.
pub fn load(character: &Character) -> i32 {
    character.items.iter().map(|item| item.slots()).sum()
}

// Sum of physical armor values of owned armor items.
pub fn physical_armor(character: &Character) -> i32 {
    character
        .items
        .iter()
        .filter_map(|item| item.as_armor())
        .filter(|armor| armor.domain == ArmorDomain::Physical)
        .map(|armor| armor.value.max(0))
        .sum()
}

pub fn social_armor(character: &Character, settings: &Settings) -> i32 {
    let mut total = 0;
    for item in &character.items {
        if let ItemKind::Armor(armor) = &item.kind {
            if armor.domain == ArmorDomain::Social {
                total += armor.value.max(0);
            }
        }
        if item.social_armor > 0 {
            total += item.social_armor;
        }
    }

    if settings.bone_ward_mitigation && owns_bone_ward(character, settings) {
        total += BONE_WARD_BONUS;
    }
    total
}

// The ward counts when its source id matches the configured one, or by name as a fallback.
pub fn owns_bone_ward(character: &Character, settings: &Settings) -> bool {
    let source_id = settings
        .bone_ward_item_source_id
        .as_deref()
        .filter(|id| !id.is_empty());

    character.items.iter().any(|item| {
        if let (Some(wanted), Some(source)) = (source_id, item.source_id.as_deref()) {
            if wanted == source {
                return true;
            }
        }
        item.name.to_lowercase().contains(BONE_WARD_NAME)
    })
}
