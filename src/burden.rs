// Burden tables: what happens when a hit drives Sand to exactly zero.
// Each domain has twelve entries indexed by a d12. Rolling a burden attaches
// every named status its effect text mentions, then records the entry
// itself as a burden item. Nothing here removes burdens; remedies in the
// effect text are left to the table.

use crate::character::{Character, Domain};
use crate::dice::{DiceExpr, DieSource, roll_expr};
use crate::item::{Burden, Item, ItemId};
use crate::status::{StatusRegistry, resolve_status, statuses_in_text};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurdenEntry {
    pub name: &'static str,
    pub slots: i32,
    pub effect: &'static str,
}

const fn entry(name: &'static str, slots: i32, effect: &'static str) -> BurdenEntry {
    BurdenEntry {
        name,
        slots,
        effect,
    }
}

pub const PHYSICAL_BURDENS: [BurdenEntry; 12] = [
    entry("Bruised", 0, "Roll 2d6. If greater than max Sand, take the new result."),
    entry(
        "Winded",
        0,
        "Lose this round, or the next if you've already acted. Roll 3d6 (drop lowest). If greater than max Sand, take the new result.",
    ),
    entry(
        "Battered",
        1,
        "Add Deprived to your Inventory (1 slot). You can't regain Sand until it's removed. After a long rest, roll 2d6. If greater than max Vigor, take the new result.",
    ),
    entry(
        "Marked",
        0,
        "You've taken a visible scar. Replace a characteristic with Scarred (1). If you already have that, raise its rank by 1.",
    ),
    entry(
        "Bloodied",
        1,
        "Add Bloodied to your Inventory (1 slot). Social tests are taken at -1. After a long rest, remove Bloodied and the penalty.",
    ),
    entry(
        "Hobbled",
        0,
        "Your footing is unsteady. Vigor tests are at disadvantage until the end of the fight. Roll 3d6 (drop highest). If greater than max Sand, take the new result.",
    ),
    entry(
        "Concussed",
        1,
        "A hard blow rattles your brain. Lose this round, or the next if you've already acted. Add Concussed to your Inventory (1 slot). Faith tests are at disadvantage until healed by a long rest.",
    ),
    entry(
        "Broken",
        0,
        "Take a fall and break something. Lose 1d4 Vigor. Once mended, roll 3d6 (drop lowest). If greater than max Vigor, take the new result.",
    ),
    entry(
        "Clobbered",
        0,
        "A hard blow causes you to lose 1d4 Vigor. Once mended, roll 3d6 (drop lowest). If greater than max Vigor, take the new result.",
    ),
    entry(
        "Bleeding",
        1,
        "Add Bleeding to your Inventory (1 slot). You can't regain Sand until healed. Lose 1d4 Vigor per day. Once healed, roll 3d6. If greater than Vigor, it is your new score.",
    ),
    entry(
        "Lamed",
        2,
        "Add Lamed to your Inventory (2 slots). Movement is halved and this can't be removed without doctoring and extended rest. Once healed, roll 3d6. If greater than Vigor, it is your new score.",
    ),
    entry(
        "Endangered",
        0,
        "This could be the end. If you fail your next Vigor Save, you die. If you succeed, replace a characteristic with Unkillable (2). If you already have that, raise its rank by 1.",
    ),
];

pub const SOCIAL_BURDENS: [BurdenEntry; 12] = [
    entry("Bruised ego", 0, "Roll 2d6. If greater than max Sand, take the new result."),
    entry(
        "Tongue-tied",
        0,
        "Lose this round, or the next if you've already acted. Roll 3d6 (drop lowest). If greater than max Sand, take the new result.",
    ),
    entry(
        "Shamed",
        1,
        "Add Shamed to your Inventory (1 slot). Your next Presence test is at disadvantage. After that test, remove Shamed.",
    ),
    entry(
        "Cornered",
        0,
        "Your rhetoric has been shifted into a corner. Your next Presence attack is at disadvantage. After this conflict, roll 3d6 (drop highest). If higher than max Presence, it is your new score.",
    ),
    entry(
        "Exposed",
        1,
        "Add Exposed to your Inventory (1 slot). Subtract 1d6 from your Presence until the end of the session. After a long rest, roll 3d6 (drop highest). If greater than max Sand, take the new result.",
    ),
    entry(
        "Rumor-stained",
        0,
        "Lose 1d4 Presence. After a long rest, roll 3d6 (drop lowest). If greater than max Presence, take the new result.",
    ),
    entry(
        "Embarrassed",
        1,
        "You've been disclaimed! Add that to your Inventory (1 slot). Presence tests are at disadvantage until rectified by a long rest.",
    ),
    entry(
        "Exposed",
        0,
        "You've been exposed as speaking with a forked tongue. Lose 1d4 Presence. After a long rest, roll 3d6 (drop lowest). If greater than max Presence, take the new result.",
    ),
    entry(
        "Branded",
        1,
        "Named as a coward. Add Branded to your Inventory (1 slot). You act last in any social conflict until fixed. After that, roll 3d6. If greater than max Presence, take the new result.",
    ),
    entry(
        "Outmaneuvered",
        1,
        "You've lost this argument. Add Foiled to your Inventory (1 slot). Lose 1d4 Presence per day. Once healed, roll 3d6. If the result is higher than your Presence, it is your new score.",
    ),
    entry(
        "Ostracized",
        2,
        "Add Ostracized to your Inventory (2 slots). Social Saves are at disadvantage. Once removed, roll 3d6. If the result is higher than your Presence, it is your new score.",
    ),
    entry(
        "Shunned",
        0,
        "If you fail your next Presence Save, your status has banished you from play. If you succeed, replace a characteristic with Return of the Mack (2). If you already have that, increase its rank by 1.",
    ),
];

pub const FAITH_BURDENS: [BurdenEntry; 12] = [
    entry("Bruised faith", 0, "Roll 2d6. If greater than max Sand, take the new result."),
    entry(
        "Rattled",
        0,
        "Lose this round, or the next if you've already acted. Roll 2d6. If greater than max Sand, take the new result.",
    ),
    entry(
        "Shaken creed",
        1,
        "Add Shaken to your Inventory (1 slot). Your next Faith test is at disadvantage. After that test, remove Shaken.",
    ),
    entry(
        "Profaned",
        1,
        "Add Profaned to your Inventory (1 slot). You cannot regain Sand while it is there. After a long rest, roll 3d6 (drop highest) and replace your Faith with this number if it is higher.",
    ),
    entry(
        "Blasphemed",
        2,
        "Add Blasphemed to your Inventory (2 slots). All Faith tests at disadvantage until removed. After a long rest, roll 3d6. If greater than Faith, take the new result and remove Blasphemed.",
    ),
    entry(
        "Unmoored",
        0,
        "Lose 1d4 Faith. Quest to regain your Faith and roll 3d6 (drop lowest). If it is higher than your current Faith, replace it.",
    ),
    entry(
        "Lapsed",
        0,
        "You are stunned for two actions as you question yourself. Vigor tests are at disadvantage until you take a long rest.",
    ),
    entry(
        "Forsaken",
        0,
        "Replace one of your characteristics with Forsaken (1). All Faith-based acts are at disadvantage with Forsaken.",
    ),
    entry(
        "Broken vow",
        0,
        "You have broken a vow. Lose 1d6 Presence. This cannot be healed until the vow has been reaffirmed by Faith.",
    ),
    entry(
        "Oathless",
        1,
        "Add Oathless to your Inventory (1 slot). Until rectified, you cannot do Acts of Faith and lose 1d4 Faith per day. Once healed, roll 3d6. If the result is higher than your Faith, it is your new score.",
    ),
    entry(
        "Excommunicated",
        2,
        "Add Excommunicated to your Inventory (2 slots). All Presence Saves are at disadvantage. This can only be removed with a major restitution. Once rectified, roll 3d6. If the result is higher than your Faith, it is your new score.",
    ),
    entry(
        "Apostate",
        0,
        "If you fail your next Faith Save, you are self-banished and removed from play. If you succeed, replace one characteristic with Unshakeable (2). If you already have it, raise its rank by 1.",
    ),
];

pub fn table(domain: Domain) -> &'static [BurdenEntry; 12] {
    match domain {
        Domain::Physical => &PHYSICAL_BURDENS,
        Domain::Social => &SOCIAL_BURDENS,
        Domain::Faith => &FAITH_BURDENS,
    }
}

// Map a d12 face onto the table; out-of-range faces clamp to the nearest end.
pub fn entry_for_roll(domain: Domain, roll: u32) -> &'static BurdenEntry {
    let index = (roll.max(1) - 1).min(11) as usize;
    &table(domain)[index]
}

pub fn roll_burden(domain: Domain, dice: &mut dyn DieSource) -> (u32, &'static BurdenEntry) {
    let roll = roll_expr(dice, DiceExpr::D12).total as u32;
    (roll, entry_for_roll(domain, roll))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurdenOutcome {
    pub domain: Domain,
    pub roll: u32,
    pub entry: BurdenEntry,
    pub attached: Vec<String>, // Named statuses attached to the character.
    pub record: ItemId,        // The burden item recording the entry itself.
}

pub fn apply_burden(
    character: &mut Character,
    domain: Domain,
    dice: &mut dyn DieSource,
    registry: &dyn StatusRegistry,
) -> BurdenOutcome {
    let (roll, entry) = roll_burden(domain, dice);

    let mut attached = Vec::new();
    for status_name in statuses_in_text(entry.effect) {
        let status = resolve_status(registry, status_name);
        character.add_item(status.to_item(domain));
        attached.push(status.name);
    }

    let record = Item::burden(
        entry.name,
        Burden {
            domain,
            effect: entry.effect.to_string(),
            duration: String::new(),
            remedy: String::new(),
            slots: entry.slots,
        },
    )
    .with_description(entry.effect);
    let record_id = record.id;
    character.add_item(record);

    log::info!(
        "{} suffers {} burden {} ({}): attached {:?}",
        character.name,
        domain,
        roll,
        entry.name,
        attached
    );

    BurdenOutcome {
        domain,
        roll,
        entry: *entry,
        attached,
        record: record_id,
    }
}
