// Import necessary modules from external crates.
use crate::dice::{DiceExpr, DiceRoll, DieSource, roll_expr};
use crate::error::RulesError;
use crate::item::Item;
use crate::resources;
use crate::settings::Settings;
use crate::tap;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
pub struct CharacterId(Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

// The three primary attributes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Attribute {
    Vigor,
    Presence,
    Faith,
}

impl Attribute {
    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Vigor => "Vigor",
            Attribute::Presence => "Presence",
            Attribute::Faith => "Faith",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Attribute::Vigor => "VIG",
            Attribute::Presence => "PRE",
            Attribute::Faith => "FTH",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Attribute {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vigor" | "vig" => Ok(Attribute::Vigor),
            "presence" | "pre" => Ok(Attribute::Presence),
            "faith" | "fth" => Ok(Attribute::Faith),
            _ => Err(RulesError::UnknownAttribute(s.to_string())),
        }
    }
}

// The three conflict (and burden) domains.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Domain {
    Physical,
    Social,
    Faith,
}

impl Domain {
    // The attribute that takes overflow once Sand is gone.
    pub fn primary_attribute(&self) -> Attribute {
        match self {
            Domain::Physical => Attribute::Vigor,
            Domain::Social => Attribute::Presence,
            Domain::Faith => Attribute::Faith,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Physical => "Physical",
            Domain::Social => "Social",
            Domain::Faith => "Faith",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Domain {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "physical" => Ok(Domain::Physical),
            "social" => Ok(Domain::Social),
            "faith" => Ok(Domain::Faith),
            _ => Err(RulesError::UnknownBurdenDomain(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub vigor: i32,
    pub presence: i32,
    pub faith: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Attributes {
            vigor: 10,
            presence: 10,
            faith: 10,
        }
    }
}

impl Attributes {
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Vigor => self.vigor,
            Attribute::Presence => self.presence,
            Attribute::Faith => self.faith,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Vigor => &mut self.vigor,
            Attribute::Presence => &mut self.presence,
            Attribute::Faith => &mut self.faith,
        }
    }
}

// A bounded value such as Sand or Reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pool {
    pub value: i32,
    pub max: i32,
}

impl Pool {
    pub fn full(max: i32) -> Self {
        Pool { value: max, max }
    }
}

// Resource block. Everything except `sand` is rewritten by `resources::derive_resources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    pub sand: Pool,
    pub inventory: i32,
    pub load: i32,
    pub reserve: Pool,
    pub social_armor: i32, // Cached for display; resolvers recompute it.
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub rank: u32,
    pub uses: u32,
    pub description: String,
    #[serde(default)]
    pub can_advance: bool,
    #[serde(default)]
    pub is_disabled: bool,
}

impl Characteristic {
    pub fn new(rank: u32, description: impl Into<String>) -> Self {
        Characteristic {
            rank: rank.max(1),
            uses: 0,
            description: description.into(),
            can_advance: false,
            is_disabled: false,
        }
    }

    // Uses needed before an advancement attempt.
    pub fn required_uses(&self) -> u32 {
        self.rank * 10
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TapTracking {
    pub global_tap_counter: u64,
    pub last_tapped_char: Option<String>,
    pub tap_history: Vec<String>, // Oldest first.
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub attributes: Attributes,
    pub resources: Resources,
    pub characteristics: BTreeMap<String, Characteristic>,
    #[serde(default)]
    pub tap_tracking: TapTracking,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub money: i32,
}

impl Character {
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(attribute)
    }

    pub fn characteristic(&self, name: &str) -> Result<&Characteristic, RulesError> {
        self.characteristics
            .get(name)
            .ok_or_else(|| RulesError::UnknownCharacteristic(name.to_string()))
    }

    pub fn characteristic_mut(&mut self, name: &str) -> Result<&mut Characteristic, RulesError> {
        self.characteristics
            .get_mut(name)
            .ok_or_else(|| RulesError::UnknownCharacteristic(name.to_string()))
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    // Recompute every derived field: resources plus characteristic flags.
    pub fn prepare_derived(&mut self, settings: &Settings) {
        resources::derive_resources(self, settings);
        tap::refresh_flags(self);
    }
}

// Builder used by hosts, generation and tests.
#[derive(Debug, Clone)]
pub struct CharacterBuilder {
    character: Character,
}

impl CharacterBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        CharacterBuilder {
            character: Character {
                id: CharacterId::new(),
                name: name.into(),
                attributes: Attributes::default(),
                resources: Resources::default(),
                characteristics: BTreeMap::new(),
                tap_tracking: TapTracking::default(),
                items: Vec::new(),
                money: 0,
            },
        }
    }

    pub fn id(mut self, id: CharacterId) -> Self {
        self.character.id = id;
        self
    }

    pub fn vigor(mut self, vigor: i32) -> Self {
        self.character.attributes.vigor = vigor;
        self
    }

    pub fn presence(mut self, presence: i32) -> Self {
        self.character.attributes.presence = presence;
        self
    }

    pub fn faith(mut self, faith: i32) -> Self {
        self.character.attributes.faith = faith;
        self
    }

    // Sets both the current and the maximum Sand.
    pub fn sand(mut self, sand: i32) -> Self {
        self.character.resources.sand = Pool::full(sand);
        self
    }

    pub fn sand_pool(mut self, value: i32, max: i32) -> Self {
        self.character.resources.sand = Pool { value, max };
        self
    }

    pub fn characteristic(mut self, name: impl Into<String>, characteristic: Characteristic) -> Self {
        self.character.characteristics.insert(name.into(), characteristic);
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.character.items.push(item);
        self
    }

    pub fn money(mut self, money: i32) -> Self {
        self.character.money = money;
        self
    }

    // Finish with derived fields computed under default settings.
    pub fn build(self) -> Character {
        self.build_with(&Settings::default())
    }

    pub fn build_with(mut self, settings: &Settings) -> Character {
        self.character.prepare_derived(settings);
        self.character
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub attribute: Attribute,
    pub roll: DiceRoll,
    pub target: i32,
    pub success: bool,
}

// Roll-under save: 1d20 against the attribute plus any tapped bonus.
pub fn roll_save(
    character: &Character,
    attribute: Attribute,
    tap_bonus: i32,
    dice: &mut dyn DieSource,
) -> SaveResult {
    let roll = roll_expr(dice, DiceExpr::D20);
    let target = character.attribute(attribute) + tap_bonus;
    let success = roll.total <= target;
    log::info!(
        "{} {} save: rolled {} vs {} ({})",
        character.name,
        attribute,
        roll.total,
        target,
        if success { "success" } else { "failure" }
    );

    SaveResult {
        attribute,
        roll,
        target,
        success,
    }
}
