// Named status effects and the registry boundary hosts implement.
use crate::character::Domain;
use crate::item::{Burden, Item};
use serde::{Deserialize, Serialize};

// Status names recognised inside burden effect text.
pub const STATUS_VOCABULARY: [&str; 18] = [
    "Deprived",
    "Bleeding",
    "Concussed",
    "Lamed",
    "Shamed",
    "Exposed",
    "Branded",
    "Foiled",
    "Ostracized",
    "Profaned",
    "Blasphemed",
    "Shaken",
    "Oathless",
    "Excommunicated",
    "Doubt",
    "Night Terrors",
    "Spiritual Weight",
    "Haunted",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTemplate {
    pub name: String,
    pub slots: i32,
    pub effect: String,
}

impl StatusTemplate {
    pub fn new(name: impl Into<String>, slots: i32, effect: impl Into<String>) -> Self {
        StatusTemplate {
            name: name.into(),
            slots,
            effect: effect.into(),
        }
    }

    // Stand-in when the registry has no entry for a status.
    pub fn minimal(name: impl Into<String>) -> Self {
        let name = name.into();
        StatusTemplate {
            effect: name.clone(),
            name,
            slots: 0,
        }
    }

    // The burden item this status becomes once attached.
    pub fn to_item(&self, domain: Domain) -> Item {
        Item::burden(
            self.name.clone(),
            Burden {
                domain,
                effect: self.effect.clone(),
                duration: String::new(),
                remedy: String::new(),
                slots: self.slots,
            },
        )
        .with_description(self.effect.clone())
    }
}

// Host/compendium lookup of status definitions.
pub trait StatusRegistry {
    fn lookup_status_by_name(&self, name: &str) -> Option<StatusTemplate>;
}

// Built-in registry seeded with the system's status compendium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultStatuses {
    statuses: Vec<StatusTemplate>,
}

impl DefaultStatuses {
    pub fn from_templates(statuses: Vec<StatusTemplate>) -> Self {
        DefaultStatuses { statuses }
    }

    // A registry with no entries; every lookup falls back to a minimal record.
    pub fn empty() -> Self {
        Self::from_templates(Vec::new())
    }

    pub fn templates(&self) -> &[StatusTemplate] {
        &self.statuses
    }
}

impl Default for DefaultStatuses {
    fn default() -> Self {
        let statuses = [
            ("Doubt", 0, "Doubt gnaws at you."),
            ("Night Terrors", 0, "Your sleep brings no rest."),
            ("Spiritual Weight", 1, "A spiritual weight presses on you."),
            ("Haunted", 0, "Something follows you."),
            ("Deprived", 1, "Cannot recover Sand or attribute damage while Deprived."),
            ("Bleeding", 1, "Cannot regain Sand; lose 1d4 Vigor per day until healed."),
            ("Concussed", 1, "Faith tests at disadvantage until healed by long rest."),
            ("Lamed", 2, "Movement halved until extended rest/doctoring."),
            ("Shamed", 1, "Next Presence test at disadvantage; then remove."),
            ("Exposed", 1, "Presence reduced temporarily; see burden effect for details."),
            ("Branded", 1, "Act last in social conflict until fixed."),
            ("Foiled", 1, "Lose 1d4 Presence per day until healed."),
            ("Ostracized", 2, "Social Saves at disadvantage until removed."),
            ("Profaned", 1, "Cannot regain Sand while present."),
            ("Blasphemed", 2, "All Faith tests at disadvantage until removed."),
            ("Shaken", 1, "Next Faith test at disadvantage; then remove."),
            ("Oathless", 1, "Cannot perform Acts of Faith; lose 1d4 Faith per day."),
            ("Excommunicated", 2, "All Presence Saves at disadvantage until major restitution."),
        ]
        .into_iter()
        .map(|(name, slots, effect)| StatusTemplate::new(name, slots, effect))
        .collect();

        DefaultStatuses { statuses }
    }
}

impl StatusRegistry for DefaultStatuses {
    fn lookup_status_by_name(&self, name: &str) -> Option<StatusTemplate> {
        self.statuses
            .iter()
            .find(|status| status.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}

// Registry lookup with the minimal fallback.
pub fn resolve_status(registry: &dyn StatusRegistry, name: &str) -> StatusTemplate {
    registry.lookup_status_by_name(name).unwrap_or_else(|| {
        log::debug!("No registry entry for status {name}, synthesizing one");
        StatusTemplate::minimal(name)
    })
}

// Every vocabulary status mentioned in `text`, case-insensitively, in vocabulary order.
pub fn statuses_in_text(text: &str) -> Vec<&'static str> {
    let haystack = text.to_lowercase();
    STATUS_VOCABULARY
        .iter()
        .copied()
        .filter(|status| haystack.contains(&status.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_statuses_case_insensitively() {
        assert_eq!(
            statuses_in_text("Add BLEEDING to your Inventory (1 slot)."),
            vec!["Bleeding"]
        );
        assert_eq!(
            statuses_in_text("You've been exposed as speaking with a forked tongue."),
            vec!["Exposed"]
        );
        assert!(statuses_in_text("Roll 2d6. If greater than max Sand, take it.").is_empty());
    }

    #[test]
    fn default_registry_covers_the_vocabulary() {
        let registry = DefaultStatuses::default();
        for name in STATUS_VOCABULARY {
            assert!(registry.lookup_status_by_name(name).is_some(), "{name} missing");
        }
        assert_eq!(
            registry.lookup_status_by_name("lamed").map(|s| s.slots),
            Some(2)
        );
    }

    #[test]
    fn unknown_status_is_synthesized() {
        let status = resolve_status(&DefaultStatuses::empty(), "Deprived");
        assert_eq!(status, StatusTemplate::minimal("Deprived"));
        assert_eq!(status.slots, 0);
    }
}
