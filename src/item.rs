// Owned items. Each kind carries its own fixed field set.
use crate::character::Domain;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RangeBand {
    Personal,
    Close,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ArmorType {
    Light,
    Medium,
    Heavy,
    Fetish,
}

// Which conflict an armor value protects against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorDomain {
    #[default]
    Physical,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponProperties {
    pub is_gun: bool, // Ignores physical armor.
    pub aoe: bool,    // Hits every selected target.
    pub melee: bool,
    pub concealed: bool,
    pub throwable: bool,
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub damage: String, // Dice formula, e.g. "1d6".
    pub range: RangeBand,
    pub shots: u32,
    pub current_shots: u32,
    #[serde(default)]
    pub properties: WeaponProperties,
    pub slots: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub armor_type: ArmorType,
    pub value: i32,
    #[serde(default)]
    pub domain: ArmorDomain,
    pub slots: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uses {
    pub value: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub uses: Option<Uses>,
    pub slots: i32,
}

// A burden or status occupying inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burden {
    pub domain: Domain,
    pub effect: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub remedy: String,
    pub slots: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Weapon(Weapon),
    Armor(Armor),
    Gear(Gear),
    Burden(Burden),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_id: Option<String>, // Compendium provenance, if imported.
    #[serde(default)]
    pub social_armor: i32, // Explicit social armor any item may grant.
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Item {
            id: ItemId::new(),
            name: name.into(),
            description: String::new(),
            source_id: None,
            social_armor: 0,
            kind,
        }
    }

    pub fn weapon(name: impl Into<String>, weapon: Weapon) -> Self {
        Self::new(name, ItemKind::Weapon(weapon))
    }

    pub fn armor(name: impl Into<String>, armor: Armor) -> Self {
        Self::new(name, ItemKind::Armor(armor))
    }

    pub fn gear(name: impl Into<String>, gear: Gear) -> Self {
        Self::new(name, ItemKind::Gear(gear))
    }

    pub fn burden(name: impl Into<String>, burden: Burden) -> Self {
        Self::new(name, ItemKind::Burden(burden))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn with_social_armor(mut self, social_armor: i32) -> Self {
        self.social_armor = social_armor;
        self
    }

    // Inventory slots this item occupies.
    pub fn slots(&self) -> i32 {
        match &self.kind {
            ItemKind::Weapon(weapon) => weapon.slots,
            ItemKind::Armor(armor) => armor.slots,
            ItemKind::Gear(gear) => gear.slots,
            ItemKind::Burden(burden) => burden.slots,
        }
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            ItemKind::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_armor(&self) -> Option<&Armor> {
        match &self.kind {
            ItemKind::Armor(armor) => Some(armor),
            _ => None,
        }
    }

    pub fn as_burden(&self) -> Option<&Burden> {
        match &self.kind {
            ItemKind::Burden(burden) => Some(burden),
            _ => None,
        }
    }

    // Spend one use of a gear item.
    // Returns the remaining uses, or `None` when the item is not gear or has
    // no finite uses pool. The pool never drops below zero.
    pub fn use_gear(&mut self) -> Option<Uses> {
        let ItemKind::Gear(Gear {
            uses: Some(uses), ..
        }) = &mut self.kind
        else {
            return None;
        };
        uses.value = uses.value.saturating_sub(1);
        log::info!("{} used ({}/{} uses left)", self.name, uses.value, uses.max);
        Some(*uses)
    }
}
