use bite_the_bullet::conflict::AttackOptions;
use bite_the_bullet::dice::FixedDice;
use bite_the_bullet::faith::{FaithFailure, FaithScale};
use bite_the_bullet::item::{Gear, Item, Uses};
use bite_the_bullet::{
    AppError, AttackRequest, Attribute, CharacterBuilder, CharacterId, CharacterStore,
    Characteristic, Domain, GameTable, JsonFileStore, MemoryStore, RulesError, Settings,
    StoreError,
};

fn rider(name: &str) -> bite_the_bullet::Character {
    CharacterBuilder::new(name)
        .sand(6)
        .characteristic("grit", Characteristic::new(2, "Grit"))
        .characteristic("charm", Characteristic::new(1, "Charm"))
        .characteristic("luck", Characteristic::new(1, "Luck"))
        .build()
}

fn table_with(faces: impl IntoIterator<Item = u32>, settings: Settings) -> GameTable<MemoryStore> {
    GameTable::new(MemoryStore::new(), settings).with_dice(FixedDice::new(faces))
}

#[tokio::test]
async fn tap_is_persisted() {
    let table = table_with([], Settings::default());
    let character = rider("Ada");
    let id = character.id;
    table.insert(character).await.unwrap();

    let outcome = table.tap(id, "grit").await.unwrap();
    assert_eq!(outcome.bonus, 2);

    let stored = table.character(id).await.unwrap();
    assert_eq!(stored.characteristics["grit"].uses, 1);
    assert_eq!(stored.tap_tracking.tap_history, vec!["grit".to_string()]);
    assert!(stored.characteristics["grit"].is_disabled);
}

#[tokio::test]
async fn concurrent_taps_on_one_character_are_serialized() {
    let table = table_with([], Settings::default());
    let character = rider("Ada");
    let id = character.id;
    table.insert(character).await.unwrap();

    let (first, second) = tokio::join!(table.tap(id, "grit"), table.tap(id, "grit"));
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(AppError::Rules(RulesError::CooldownViolation { .. }))
    )));

    let stored = table.character(id).await.unwrap();
    assert_eq!(stored.characteristics["grit"].uses, 1);
    assert_eq!(stored.tap_tracking.tap_history.len(), 1);
    assert_eq!(stored.tap_tracking.global_tap_counter, 1);
}

#[tokio::test]
async fn advancement_is_persisted() {
    let table = table_with([5], Settings::default());
    let character = CharacterBuilder::new("Ada")
        .characteristic(
            "grit",
            Characteristic {
                uses: 20,
                ..Characteristic::new(2, "Grit")
            },
        )
        .build();
    let id = character.id;
    table.insert(character).await.unwrap();

    table.attempt_advance(id, "grit").await.unwrap();
    let stored = table.character(id).await.unwrap();
    assert_eq!(stored.characteristics["grit"].rank, 3);
    assert_eq!(stored.characteristics["grit"].uses, 0);
}

#[tokio::test]
async fn tapped_attack_persists_attacker_and_target() {
    let table = table_with([3], Settings::default());
    let attacker = rider("Attacker");
    let target = rider("Target");
    let bystander = rider("Bystander");
    let (attacker_id, target_id, bystander_id) = (attacker.id, target.id, bystander.id);
    for character in [attacker, target, bystander] {
        table.insert(character).await.unwrap();
    }

    let request = AttackRequest::new(attacker_id, Domain::Physical, vec![target_id, bystander_id])
        .tapping("grit");
    let report = table.attack(request).await.unwrap();
    assert_eq!(report.tap.as_ref().map(|tap| tap.bonus), Some(2));
    assert_eq!(report.result.damage, 5);
    assert_eq!(report.result.targets.len(), 1);

    let target = table.character(target_id).await.unwrap();
    assert_eq!(target.resources.sand.value, 1);
    let bystander = table.character(bystander_id).await.unwrap();
    assert_eq!(bystander.resources.sand.value, 6);
    let attacker = table.character(attacker_id).await.unwrap();
    assert_eq!(attacker.characteristics["grit"].uses, 1);
}

#[tokio::test]
async fn failed_attack_does_not_persist_the_tap() {
    let table = table_with([3], Settings::default());
    let attacker = rider("Attacker");
    let attacker_id = attacker.id;
    table.insert(attacker).await.unwrap();

    let request = AttackRequest::new(attacker_id, Domain::Social, Vec::new()).tapping("grit");
    let result = table.attack(request).await;
    assert!(matches!(
        result,
        Err(AppError::Rules(RulesError::InsufficientTarget))
    ));

    let attacker = table.character(attacker_id).await.unwrap();
    assert_eq!(attacker.characteristics["grit"].uses, 0);
    assert!(attacker.tap_tracking.tap_history.is_empty());
}

#[tokio::test]
async fn area_attack_can_catch_the_attacker() {
    let table = table_with([4], Settings::default());
    let attacker = rider("Dynamiter");
    let ally = rider("Ally");
    let (attacker_id, ally_id) = (attacker.id, ally.id);
    table.insert(attacker).await.unwrap();
    table.insert(ally).await.unwrap();

    let options = AttackOptions {
        aoe: true,
        ..Default::default()
    };
    let request = AttackRequest::new(attacker_id, Domain::Physical, vec![ally_id, attacker_id])
        .options(options)
        .tapping("luck");
    let report = table.attack(request).await.unwrap();
    assert_eq!(report.result.damage, 5);
    assert_eq!(report.result.targets.len(), 2);

    let attacker = table.character(attacker_id).await.unwrap();
    assert_eq!(attacker.resources.sand.value, 1);
    assert_eq!(attacker.characteristics["luck"].uses, 1);
    let ally = table.character(ally_id).await.unwrap();
    assert_eq!(ally.resources.sand.value, 1);
}

#[tokio::test]
async fn refused_act_of_faith_keeps_the_tap() {
    let table = table_with([1], Settings::default());
    let character = CharacterBuilder::new("Overloaded")
        .characteristic("grit", Characteristic::new(1, "Grit"))
        .item(Item::gear("Anvil", Gear { uses: None, slots: 9 }))
        .build();
    let id = character.id;
    table.insert(character).await.unwrap();

    let result = table.act_of_faith(id, FaithScale::Moderate, Some("grit")).await;
    assert!(matches!(
        result,
        Err(AppError::Rules(RulesError::InsufficientReserve {
            required: 2,
            available: 1
        }))
    ));
    let stored = table.character(id).await.unwrap();
    assert!(stored.tap_tracking.tap_history.is_empty());
}

#[tokio::test]
async fn faith_status_flow_round_trips_through_the_table() {
    let settings = Settings {
        faith_failure_uses_status: true,
        ..Settings::default()
    };
    let table = table_with([20], settings);
    let character = rider("Believer");
    let id = character.id;
    table.insert(character).await.unwrap();

    let report = table.act_of_faith(id, FaithScale::Minor, None).await.unwrap();
    assert!(matches!(
        report.result.failure,
        Some(FaithFailure::ChooseStatus { .. })
    ));

    let item = table.apply_faith_status(id, "Haunted").await.unwrap();
    let stored = table.character(id).await.unwrap();
    assert!(stored.items.iter().any(|owned| owned.id == item && owned.name == "Haunted"));
}

#[tokio::test]
async fn burden_domain_is_validated() {
    let table = table_with([7], Settings::default());
    let character = rider("Victim");
    let id = character.id;
    table.insert(character).await.unwrap();

    assert!(matches!(
        table.apply_burden(id, "arcane").await,
        Err(AppError::Rules(RulesError::UnknownBurdenDomain(_)))
    ));

    let outcome = table.apply_burden(id, "Physical").await.unwrap();
    assert_eq!(outcome.entry.name, "Concussed");
    let stored = table.character(id).await.unwrap();
    assert_eq!(stored.items.len(), 2);
    assert_eq!(stored.resources.load, 2);
}

#[tokio::test]
async fn tapped_save_adds_rank_to_target() {
    let table = table_with([12], Settings::default());
    let character = rider("Saver");
    let id = character.id;
    table.insert(character).await.unwrap();

    let report = table.roll_save(id, Attribute::Vigor, Some("grit")).await.unwrap();
    assert_eq!(report.result.target, 12);
    assert!(report.result.success);
    let stored = table.character(id).await.unwrap();
    assert_eq!(stored.characteristics["grit"].uses, 1);
}

#[tokio::test]
async fn gear_uses_are_spent() {
    let table = table_with([], Settings::default());
    let lead = Item::gear(
        "Lead",
        Gear {
            uses: Some(Uses { value: 2, max: 2 }),
            slots: 1,
        },
    );
    let character = rider("Shooter");
    let id = character.id;
    table.insert(character).await.unwrap();
    let lead_id = table.attach_item(id, lead).await.unwrap();

    assert_eq!(
        table.use_gear(id, lead_id).await.unwrap(),
        Some(Uses { value: 1, max: 2 })
    );
    let stored = table.character(id).await.unwrap();
    assert_eq!(stored.resources.load, 1);

    let missing = bite_the_bullet::ItemId::new();
    assert!(matches!(
        table.use_gear(id, missing).await,
        Err(AppError::Rules(RulesError::UnknownItem(item))) if item == missing
    ));
}

#[tokio::test]
async fn unknown_characters_are_store_errors() {
    let table = table_with([], Settings::default());
    let id = CharacterId::new();
    assert!(matches!(
        table.tap(id, "grit").await,
        Err(AppError::Store(StoreError::CharacterNotFound(missing))) if missing == id
    ));
}

#[tokio::test]
async fn generated_characters_land_in_the_json_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();
    let table = GameTable::new(store, Settings::default());

    let created = table.create_character("Wanderer").await.unwrap();
    let loaded = table.character(created.id).await.unwrap();
    assert_eq!(loaded, created);

    let listed = table.store().list().unwrap();
    assert_eq!(listed, vec![created.id.to_string()]);
    assert_eq!(table.store().read_character(created.id).unwrap(), created);
}
