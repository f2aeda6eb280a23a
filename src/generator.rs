// Random character generation.
// Attributes are 3d6 each and Sand is 2d6. Five characteristics come from
// d10 tables; the bond starts blank. Starting kit is one armor (d5), one
// weapon (d8) and three pieces of gear (d20). Gun-toters also carry 1d4+1
// lead, which takes a slot. Coin is 1d6.

use crate::character::{Character, CharacterBuilder, Characteristic};
use crate::dice::{DiceExpr, DieSource, roll_expr};
use crate::item::{
    Armor, ArmorDomain, ArmorType, Gear, Item, RangeBand, Uses, Weapon, WeaponProperties,
};
use crate::settings::Settings;

pub const BOND: &str = "bond";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitEntry {
    pub name: &'static str,
    pub desc: &'static str,
}

const fn tr(name: &'static str, desc: &'static str) -> TraitEntry {
    TraitEntry { name, desc }
}

pub const BACKGROUNDS: [TraitEntry; 10] = [
    tr("Mine-born", "You grew up underground. Tough as bedrock and wary of collapse."),
    tr("Drifter", "Always on the move. You read people and places before they read you."),
    tr("Ex-preacher", "You speak in parables, your eyes heavy with judgment."),
    tr("Scout", "You know where to walk, what to track, and when to vanish."),
    tr("Homesteader", "You know how to fix things yourself. Stubborn, frugal, and proud."),
    tr("Sharpshooter", "Trained to breathe steadily and end things at a distance."),
    tr("Dustmarshal's whelp", "Raised among the law, but the law don't raise saints."),
    tr("Salt flat smuggler", "You've run contraband past bandits and a whole lot worse."),
    tr("Gun pit fighter", "You know exactly what a man looks like right before he breaks."),
    tr("Rustwalker", "You scavenge ruins without flinching at the bones."),
];

pub const REPUTATIONS: [TraitEntry; 10] = [
    tr("Shot Wyatt at sundown", "True or not, folks believe it."),
    tr("Hex-touched", "People whisper you got bad blood or stranger gifts."),
    tr("Burned a town down", "Everyone's got an opinion on what really happened."),
    tr("Old hand", "Seen as seasoned, maybe too seasoned."),
    tr("Cold-eyed killer", "Your stare alone chills most men."),
    tr("Broken man", "They say you've lost everything, and it shows."),
    tr("Witch's favor", "Rumor has it that something inhuman watches over you."),
    tr("Last of the line", "Your name still carries weight...or warning."),
    tr("Silver-tongued devil", "You can talk most into deals they'll regret."),
    tr("Died once", "They say you were buried. You say nothing."),
];

pub const FORTITUDES: [TraitEntry; 10] = [
    tr("Justice above all", "Fair or foul, you won't let wrong stand."),
    tr("The old ways", "You heed traditions carved in stone or bone."),
    tr("Blood oath", "Loyalty to kin, clan, or cause overrides fear."),
    tr("Grace under fire", "Calm ain't a tactic. It's your only way through."),
    tr("Work is worth", "You believe effort should earn its due."),
    tr("Don't look back", "The past is dead. Forward's all that matters."),
    tr("Protect the weak", "You can't abide cruelty, even when it's easy."),
    tr("Owe a debt", "Something big keeps your hand steady and your head low."),
    tr("Survive, always", "Survival isn't luck, it's will sharpened by fire."),
    tr("Faith in something", "Maybe God, maybe it's just the Sun. But it keeps you walking."),
];

pub const FOIBLES: [TraitEntry; 10] = [
    tr("Short fuse", "You burn hot, fast, and loud."),
    tr("Drinks to forget", "You self-medicate with every bottle, every night."),
    tr("Can't let go", "You obsess over the thing you lost...or caused."),
    tr("Bleeds for strangers", "You help even when it hurts."),
    tr("Never backs down", "Pride is your shield, even when it cracks."),
    tr("Haunted by dreams", "You've seen things you wish you hadn't."),
    tr("Reckless hope", "You expect good in places it don't belong."),
    tr("Always watching", "You trust no one, not even yourself."),
    tr("Compulsive fixer", "You can't leave broken things alone."),
    tr("Vow of silence", "You don't speak unless it's carved in fire."),
];

pub const ISSUES: [TraitEntry; 10] = [
    tr("Craves meaning", "You can't stand the thought that it's all for nothing."),
    tr("Seeks the one who left", "Someone walked out. You're still chasing."),
    tr("Faith in fire", "You believe only destruction cleanses."),
    tr("Tainted by the past", "Something you did or were part of won't stay buried."),
    tr("The thing beneath", "You dream of tunnels. You wake cold."),
    tr("Marked by prophecy", "You've read your fate. You're making it real."),
    tr("Addicted to risk", "The edge calls louder than any reward."),
    tr("Owes a devil's favor", "You took help you shouldn't have. It's still watching."),
    tr("Seeks an end", "Some part of you walks toward death, always."),
    tr("Afraid to love again", "You keep everyone at the far end of your reach."),
];

// Characteristic tables in the order they are rolled.
pub const CHARACTERISTIC_TABLES: [(&str, &[TraitEntry; 10]); 5] = [
    ("background", &BACKGROUNDS),
    ("reputation", &REPUTATIONS),
    ("fortitude", &FORTITUDES),
    ("foible", &FOIBLES),
    ("issue", &ISSUES),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorEntry {
    pub name: &'static str,
    pub armor: i32,
    pub slots: i32,
    pub desc: &'static str,
}

pub const ARMORS: [ArmorEntry; 5] = [
    ArmorEntry {
        name: "Duster coat",
        armor: 1,
        slots: 1,
        desc: "Worn leather, oil-waxed for trail grit. Light but better than nothing.",
    },
    ArmorEntry {
        name: "Rancher's vest",
        armor: 2,
        slots: 1,
        desc: "Thick quilted leather layered with scraps of metal or bone. Uncomfortable but sturdy.",
    },
    ArmorEntry {
        name: "Railhand plate",
        armor: 2,
        slots: 2,
        desc: "Salvaged breastplate from a collapsed ironclad engine. Heavy and clumsy, but solid.",
    },
    ArmorEntry {
        name: "Scavver leathers",
        armor: 1,
        slots: 1,
        desc: "Patchwork hides, reinforced with wire mesh and thick canvas. Worn by dust-pickers.",
    },
    ArmorEntry {
        name: "Bone-ward fetish",
        armor: 0,
        slots: 0,
        desc: "No protection to speak of, but hung with charms, bones, or glyphs. May ward off fear or stranger things.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponEntry {
    pub name: &'static str,
    pub damage: &'static str,
    pub slots: i32,
    pub range: RangeBand,
    pub traits: &'static str,
    pub shots: u32,
    pub properties: WeaponProperties,
}

const NO_PROPERTIES: WeaponProperties = WeaponProperties {
    is_gun: false,
    aoe: false,
    melee: false,
    concealed: false,
    throwable: false,
    silent: false,
};

pub const WEAPONS: [WeaponEntry; 8] = [
    WeaponEntry {
        name: "Revolver",
        damage: "1d6",
        slots: 1,
        range: RangeBand::Close,
        traits: "6 shots",
        shots: 6,
        properties: WeaponProperties {
            is_gun: true,
            ..NO_PROPERTIES
        },
    },
    WeaponEntry {
        name: "Lever-action rifle",
        damage: "1d6",
        slots: 2,
        range: RangeBand::Medium,
        traits: "5 shots",
        shots: 5,
        properties: WeaponProperties {
            is_gun: true,
            ..NO_PROPERTIES
        },
    },
    WeaponEntry {
        name: "Coach gun",
        damage: "1d6",
        slots: 2,
        range: RangeBand::Close,
        traits: "AoE, 2 shots",
        shots: 2,
        properties: WeaponProperties {
            is_gun: true,
            aoe: true,
            ..NO_PROPERTIES
        },
    },
    WeaponEntry {
        name: "Knife",
        damage: "1d4",
        slots: 1,
        range: RangeBand::Personal,
        traits: "Concealable, melee only",
        shots: 0,
        properties: WeaponProperties {
            melee: true,
            concealed: true,
            ..NO_PROPERTIES
        },
    },
    WeaponEntry {
        name: "Saber",
        damage: "1d6",
        slots: 1,
        range: RangeBand::Personal,
        traits: "May be used for social conflict",
        shots: 0,
        properties: WeaponProperties {
            melee: true,
            ..NO_PROPERTIES
        },
    },
    WeaponEntry {
        name: "Tomahawk",
        damage: "1d6",
        slots: 1,
        range: RangeBand::Personal,
        traits: "Melee, throwable (Close)",
        shots: 0,
        properties: WeaponProperties {
            melee: true,
            throwable: true,
            ..NO_PROPERTIES
        },
    },
    WeaponEntry {
        name: "Bullwhip",
        damage: "1d4",
        slots: 1,
        range: RangeBand::Close,
        traits: "No melee, may impair target",
        shots: 0,
        properties: NO_PROPERTIES,
    },
    WeaponEntry {
        name: "Bow & arrows",
        damage: "1d6",
        slots: 2,
        range: RangeBand::Close,
        traits: "Silent, 6 shots",
        shots: 6,
        properties: WeaponProperties {
            silent: true,
            ..NO_PROPERTIES
        },
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearEntry {
    pub name: &'static str,
    pub slots: i32,
    pub desc: &'static str,
}

const fn gear(name: &'static str, slots: i32, desc: &'static str) -> GearEntry {
    GearEntry { name, slots, desc }
}

pub const GEAR: [GearEntry; 20] = [
    gear("Tinderbox", 1, "Flint, steel, and dry scrap tucked in a tin."),
    gear("Canteen", 1, "Half-full. The water's clean. For now."),
    gear("Bundle of jerky", 1, "String-tied meat: probably goat, possibly not."),
    gear("Whetstone", 0, "Keeps blades sharp and minds steady."),
    gear("Traveler's Bible", 1, "Pages marked in charcoal and blood."),
    gear("Coil of wire", 1, "Thin but strong. 10 feet, barbed in spots."),
    gear("Harmonica", 0, "Dented, off-tune, but it carries memory."),
    gear("Wooden idol", 0, "Small and worn smooth. You don't remember who carved it."),
    gear("Notebook & charcoal stub", 1, "Half-filled with symbols, maps, names."),
    gear("Spool of thread & needle", 1, "For stitching gear or yourself."),
    gear("Bottle of whiskey", 1, "Three good swigs left."),
    gear("Bear trap", 2, "Folded and rusted. Still snaps like judgment. (d12 damage)"),
    gear("Hand mirror", 1, "Cracked across the middle."),
    gear("Tin cup", 0, "Dented and burned. Always warm when you wake."),
    gear("Lockbox (empty)", 2, "Heavy, padlocked, and no key in sight."),
    gear("Rope (20 ft.)", 1, "Rough, stiff hemp. Smells of boats or gallows."),
    gear("Signal whistle", 0, "Loud, shrill, from another time."),
    gear("Fashionable top hat", 1, "Doesn't fit quite right."),
    gear("Old coin", 0, "Face is scratched off. Warm to the touch."),
    gear("Goggles", 1, "Dust-scratched lenses and a cracked leather strap."),
];

// Pick the entry for a 1-based face, clamped into the table.
fn pick<T>(table: &[T], roll: i32) -> &T {
    let index = (roll.max(1) as usize - 1).min(table.len() - 1);
    &table[index]
}

fn roll(dice: &mut dyn DieSource, count: u32, sides: u32) -> i32 {
    roll_expr(dice, DiceExpr::new(count, sides)).total
}

pub fn weapon_item(entry: &WeaponEntry) -> Item {
    Item::weapon(
        entry.name,
        Weapon {
            damage: entry.damage.to_string(),
            range: entry.range,
            shots: entry.shots,
            current_shots: entry.shots, // Start fully loaded.
            properties: entry.properties,
            slots: entry.slots,
        },
    )
    .with_description(entry.traits)
}

pub fn armor_item(entry: &ArmorEntry) -> Item {
    let armor_type = if entry.armor > 0 {
        ArmorType::Light
    } else {
        ArmorType::Fetish
    };
    Item::armor(
        entry.name,
        Armor {
            armor_type,
            value: entry.armor,
            domain: ArmorDomain::Physical,
            slots: entry.slots,
        },
    )
    .with_description(entry.desc)
}

pub fn gear_item(entry: &GearEntry) -> Item {
    Item::gear(
        entry.name,
        Gear {
            uses: Some(Uses { value: 1, max: 1 }),
            slots: entry.slots,
        },
    )
    .with_description(entry.desc)
}

// Ammunition for a starting firearm; occupies one slot.
pub fn lead_item(rounds: u32) -> Item {
    Item::gear(
        "Lead",
        Gear {
            uses: Some(Uses {
                value: rounds,
                max: rounds,
            }),
            slots: 1,
        },
    )
    .with_description("Rounds for your firearm.")
}

pub fn generate_character(
    name: impl Into<String>,
    dice: &mut dyn DieSource,
    settings: &Settings,
) -> Character {
    let vigor = roll(dice, 3, 6);
    let presence = roll(dice, 3, 6);
    let faith = roll(dice, 3, 6);
    let sand = roll(dice, 2, 6);

    let mut builder = CharacterBuilder::new(name)
        .vigor(vigor)
        .presence(presence)
        .faith(faith)
        .sand(sand);

    for (characteristic, table) in CHARACTERISTIC_TABLES {
        let entry = pick(table, roll(dice, 1, 10));
        builder = builder.characteristic(
            characteristic,
            Characteristic::new(1, format!("{}: {}", entry.name, entry.desc)),
        );
    }
    builder = builder.characteristic(BOND, Characteristic::new(1, ""));

    let armor = pick(&ARMORS, roll(dice, 1, 5));
    let weapon = pick(&WEAPONS, roll(dice, 1, 8));
    builder = builder.item(armor_item(armor)).item(weapon_item(weapon));
    for _ in 0..3 {
        builder = builder.item(gear_item(pick(&GEAR, roll(dice, 1, 20))));
    }

    if weapon.properties.is_gun {
        let rounds = roll(dice, 1, 4) + 1;
        builder = builder.item(lead_item(rounds as u32));
    }
    let coin = roll(dice, 1, 6);

    let character = builder.money(coin).build_with(settings);
    log::info!(
        "Generated {}: VIG {} PRE {} FTH {} Sand {}, {} with {}",
        character.name,
        vigor,
        presence,
        faith,
        sand,
        armor.name,
        weapon.name
    );
    character
}
