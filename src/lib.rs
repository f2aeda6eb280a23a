pub mod burden;
pub mod character;
pub mod conflict;
pub mod dice;
pub mod error;
pub mod faith;
pub mod generator;
pub mod item;
pub mod logging;
pub mod resources;
pub mod settings;
pub mod status;
pub mod store;
pub mod table;
pub mod tap;

// Re-export commonly used items for easier access
pub use burden::{BurdenEntry, BurdenOutcome, apply_burden, roll_burden};
pub use character::{
    Attribute, Character, CharacterBuilder, CharacterId, Characteristic, Domain, SaveResult,
    roll_save,
};
pub use conflict::{AttackOptions, ConflictResult, LayeredDamage, resolve_conflict};
pub use dice::{DiceExpr, DiceRoll, DieSource, FixedDice, RandomDice};
pub use error::{AppError, RulesError, StoreError};
pub use faith::{FaithFailure, FaithFailurePolicy, FaithOutcome, FaithScale, act_of_faith};
pub use generator::generate_character;
pub use item::{Item, ItemId, ItemKind};
pub use settings::Settings;
pub use status::{DefaultStatuses, StatusRegistry, StatusTemplate};
pub use store::{CharacterStore, JsonFileStore, MemoryStore};
pub use table::{AttackRequest, GameTable, Tapped};
pub use tap::{AdvanceOutcome, TapOutcome};
