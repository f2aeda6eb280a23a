// World-level toggles the rules engine reads. Passed explicitly into every resolver.
use crate::faith::FaithFailurePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};

pub const DEFAULT_TAP_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub faith_failure_uses_status: bool, // Failed Acts of Faith attach a chosen status instead of damage.
    pub bone_ward_mitigation: bool,      // Owning the ward item grants +1 social armor.
    pub bone_ward_item_source_id: Option<String>, // Compendium id of the ward item.
    pub tap_history_limit: usize,        // Taps remembered per character.
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            faith_failure_uses_status: false,
            bone_ward_mitigation: false,
            bone_ward_item_source_id: None,
            tap_history_limit: DEFAULT_TAP_HISTORY_LIMIT,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    // The failure branch an Act of Faith takes under these settings.
    pub fn faith_failure_policy(&self) -> FaithFailurePolicy {
        if self.faith_failure_uses_status {
            FaithFailurePolicy::Status
        } else {
            FaithFailurePolicy::Damage
        }
    }

    // Load settings from a specified file path.
    pub fn load_settings_from_file(path: &str) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    // Save current settings to a specified file path.
    pub fn save_to_file(&self, path: &str) -> io::Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = std::path::Path::new(path).parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }
}
