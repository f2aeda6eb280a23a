// The host-facing game table.
// Every operation loads the characters it touches, runs the rules engine on
// local copies and writes them back only when the whole operation
// succeeded. A per-character `tokio::sync::Mutex` is held across that
// read-modify-write so two requests for the same character never
// interleave. Operations over several characters lock them in ascending id
// order.

use crate::burden::{self, BurdenOutcome};
use crate::character::{Attribute, Character, CharacterId, Domain, SaveResult, roll_save};
use crate::conflict::{self, AttackOptions, ConflictResult};
use crate::dice::{DieSource, RandomDice};
use crate::error::{AppError, RulesError};
use crate::faith::{self, FaithOutcome, FaithScale};
use crate::generator;
use crate::item::{Item, ItemId, Uses};
use crate::settings::Settings;
use crate::status::{DefaultStatuses, StatusRegistry};
use crate::store::CharacterStore;
use crate::tap::{self, AdvanceOutcome, TapOutcome};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

// A result together with the tap that fed its bonus, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tapped<T> {
    pub tap: Option<TapOutcome>,
    #[serde(flatten)]
    pub result: T,
}

#[derive(Debug, Clone)]
pub struct AttackRequest {
    pub attacker: CharacterId,
    pub targets: Vec<CharacterId>,
    pub domain: Domain,
    pub options: AttackOptions,
    pub tap: Option<String>, // Characteristic the attacker taps for this attack.
}

impl AttackRequest {
    pub fn new(attacker: CharacterId, domain: Domain, targets: Vec<CharacterId>) -> Self {
        AttackRequest {
            attacker,
            targets,
            domain,
            options: AttackOptions::default(),
            tap: None,
        }
    }

    pub fn options(mut self, options: AttackOptions) -> Self {
        self.options = options;
        self
    }

    pub fn tapping(mut self, characteristic: impl Into<String>) -> Self {
        self.tap = Some(characteristic.into());
        self
    }
}

pub struct GameTable<S: CharacterStore> {
    store: S,
    settings: Settings,
    registry: Box<dyn StatusRegistry + Send + Sync>,
    dice: std::sync::Mutex<Box<dyn DieSource + Send>>,
    locks: Mutex<HashMap<CharacterId, Arc<Mutex<()>>>>,
}

impl<S: CharacterStore> GameTable<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        let dice: Box<dyn DieSource + Send> = Box::new(RandomDice::new(StdRng::from_os_rng()));
        GameTable {
            store,
            settings,
            registry: Box::new(DefaultStatuses::default()),
            dice: std::sync::Mutex::new(dice),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_dice(mut self, dice: impl DieSource + Send + 'static) -> Self {
        let dice: Box<dyn DieSource + Send> = Box::new(dice);
        self.dice = std::sync::Mutex::new(dice);
        self
    }

    pub fn with_registry(mut self, registry: impl StatusRegistry + Send + Sync + 'static) -> Self {
        self.registry = Box::new(registry);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // Lock every listed character, in ascending id order and once each.
    async fn lock_characters(&self, ids: &[CharacterId]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids = ids.to_vec();
        ids.sort();
        ids.dedup();

        let handles: Vec<Arc<Mutex<()>>> = {
            let mut locks = self.locks.lock().await;
            // Drop handles nobody holds or waits on.
            locks.retain(|_, handle| Arc::strong_count(handle) > 1);
            ids.iter()
                .map(|id| Arc::clone(locks.entry(*id).or_default()))
                .collect()
        };

        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }
        guards
    }

    fn roll_with<T>(&self, f: impl FnOnce(&mut dyn DieSource) -> T) -> T {
        // A panic mid-roll leaves the source usable.
        let mut dice = self.dice.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **dice)
    }

    fn load(&self, id: CharacterId) -> Result<Character, AppError> {
        let mut character = self.store.read_character(id)?;
        character.prepare_derived(&self.settings);
        Ok(character)
    }

    fn tap_for(
        &self,
        character: &mut Character,
        characteristic: Option<&str>,
    ) -> Result<Option<TapOutcome>, RulesError> {
        characteristic
            .map(|name| tap::tap(character, name, self.settings.tap_history_limit))
            .transpose()
    }

    // Roll a fresh character and store it.
    pub async fn create_character(&self, name: impl Into<String>) -> Result<Character, AppError> {
        let character =
            self.roll_with(|dice| generator::generate_character(name, dice, &self.settings));
        let _guards = self.lock_characters(&[character.id]).await;
        self.store.write_character(&character)?;
        Ok(character)
    }

    // Store a character built elsewhere, replacing any copy with the same id.
    pub async fn insert(&self, mut character: Character) -> Result<(), AppError> {
        let _guards = self.lock_characters(&[character.id]).await;
        character.prepare_derived(&self.settings);
        self.store.write_character(&character)?;
        Ok(())
    }

    pub async fn character(&self, id: CharacterId) -> Result<Character, AppError> {
        let _guards = self.lock_characters(&[id]).await;
        self.load(id)
    }

    pub async fn tap(&self, id: CharacterId, characteristic: &str) -> Result<TapOutcome, AppError> {
        let _guards = self.lock_characters(&[id]).await;
        let mut character = self.load(id)?;
        let outcome = tap::tap(&mut character, characteristic, self.settings.tap_history_limit)?;
        self.store.write_character(&character)?;
        Ok(outcome)
    }

    pub async fn attempt_advance(
        &self,
        id: CharacterId,
        characteristic: &str,
    ) -> Result<AdvanceOutcome, AppError> {
        let _guards = self.lock_characters(&[id]).await;
        let mut character = self.load(id)?;
        let outcome =
            self.roll_with(|dice| tap::attempt_advance(&mut character, characteristic, dice))?;
        if matches!(outcome, AdvanceOutcome::Rolled { .. }) {
            self.store.write_character(&character)?;
        }
        Ok(outcome)
    }

    // Resolve an attack and persist everyone it changed.
    // An attacker may appear among the targets of an area attack; it is then
    // treated as a single character that both tapped and took damage.
    pub async fn attack(&self, request: AttackRequest) -> Result<Tapped<ConflictResult>, AppError> {
        let mut ids = request.targets.clone();
        ids.push(request.attacker);
        let _guards = self.lock_characters(&ids).await;

        let mut attacker = self.load(request.attacker)?;
        let tap = self.tap_for(&mut attacker, request.tap.as_deref())?;
        let mut options = request.options;
        options.tap_bonus += tap.as_ref().map_or(0, |tap| tap.bonus);

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(request.targets.len());
        for id in request.targets {
            if !seen.insert(id) {
                continue;
            }
            if id == attacker.id {
                targets.push(attacker.clone());
            } else {
                targets.push(self.load(id)?);
            }
        }

        let result = self.roll_with(|dice| {
            conflict::resolve_conflict(
                attacker.id,
                request.domain,
                &options,
                &mut targets,
                &self.settings,
                dice,
                self.registry.as_ref(),
            )
        })?;

        let hit: HashSet<CharacterId> = result.targets.iter().map(|outcome| outcome.target).collect();
        for target in targets.into_iter().filter(|target| hit.contains(&target.id)) {
            if target.id == attacker.id {
                attacker = target;
            } else {
                self.store.write_character(&target)?;
            }
        }
        if tap.is_some() || hit.contains(&attacker.id) {
            self.store.write_character(&attacker)?;
        }

        Ok(Tapped { tap, result })
    }

    pub async fn physical_attack(
        &self,
        attacker: CharacterId,
        targets: Vec<CharacterId>,
        options: AttackOptions,
    ) -> Result<Tapped<ConflictResult>, AppError> {
        self.attack(AttackRequest::new(attacker, Domain::Physical, targets).options(options))
            .await
    }

    pub async fn social_attack(
        &self,
        attacker: CharacterId,
        targets: Vec<CharacterId>,
        options: AttackOptions,
    ) -> Result<Tapped<ConflictResult>, AppError> {
        self.attack(AttackRequest::new(attacker, Domain::Social, targets).options(options))
            .await
    }

    // Act of Faith under the configured failure policy.
    pub async fn act_of_faith(
        &self,
        id: CharacterId,
        scale: FaithScale,
        tap: Option<&str>,
    ) -> Result<Tapped<FaithOutcome>, AppError> {
        let _guards = self.lock_characters(&[id]).await;
        let mut character = self.load(id)?;
        // Reserve is checked before the tap so a refused act costs nothing.
        faith::check_reserve(&character, scale)?;
        let tap = self.tap_for(&mut character, tap)?;
        let bonus = tap.as_ref().map_or(0, |tap| tap.bonus);

        let result = self.roll_with(|dice| {
            faith::act_of_faith(
                &mut character,
                scale,
                bonus,
                self.settings.faith_failure_policy(),
                &self.settings,
                dice,
                self.registry.as_ref(),
            )
        })?;
        self.store.write_character(&character)?;
        Ok(Tapped { tap, result })
    }

    pub async fn apply_faith_status(&self, id: CharacterId, choice: &str) -> Result<ItemId, AppError> {
        let _guards = self.lock_characters(&[id]).await;
        let mut character = self.load(id)?;
        let item =
            faith::apply_faith_status(&mut character, choice, &self.settings, self.registry.as_ref())?;
        self.store.write_character(&character)?;
        Ok(item)
    }

    // Roll and apply a burden for a domain named by the host.
    pub async fn apply_burden(&self, id: CharacterId, domain: &str) -> Result<BurdenOutcome, AppError> {
        let domain: Domain = domain.parse()?;
        let _guards = self.lock_characters(&[id]).await;
        let mut character = self.load(id)?;
        let outcome = self.roll_with(|dice| {
            burden::apply_burden(&mut character, domain, dice, self.registry.as_ref())
        });
        character.prepare_derived(&self.settings);
        self.store.write_character(&character)?;
        Ok(outcome)
    }

    pub async fn roll_save(
        &self,
        id: CharacterId,
        attribute: Attribute,
        tap: Option<&str>,
    ) -> Result<Tapped<SaveResult>, AppError> {
        let _guards = self.lock_characters(&[id]).await;
        let mut character = self.load(id)?;
        let tap = self.tap_for(&mut character, tap)?;
        let bonus = tap.as_ref().map_or(0, |tap| tap.bonus);
        let result = self.roll_with(|dice| roll_save(&character, attribute, bonus, dice));
        if tap.is_some() {
            self.store.write_character(&character)?;
        }
        Ok(Tapped { tap, result })
    }

    pub async fn attach_item(&self, id: CharacterId, item: Item) -> Result<ItemId, AppError> {
        let _guards = self.lock_characters(&[id]).await;
        let mut character = self.load(id)?;
        let item_id = item.id;
        character.add_item(item);
        character.prepare_derived(&self.settings);
        self.store.write_character(&character)?;
        Ok(item_id)
    }

    // Spend one use of a gear item; `None` when the item has no uses to spend.
    pub async fn use_gear(&self, id: CharacterId, item: ItemId) -> Result<Option<Uses>, AppError> {
        let _guards = self.lock_characters(&[id]).await;
        let mut character = self.load(id)?;
        let uses = character
            .items
            .iter_mut()
            .find(|owned| owned.id == item)
            .ok_or(RulesError::UnknownItem(item))?
            .use_gear();
        if uses.is_some() {
            self.store.write_character(&character)?;
        }
        Ok(uses)
    }
}
