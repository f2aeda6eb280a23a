use bite_the_bullet::dice::FixedDice;
use bite_the_bullet::tap::{self, AdvanceOutcome};
use bite_the_bullet::{Character, CharacterBuilder, Characteristic, RulesError};

fn history(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn drifter() -> Character {
    CharacterBuilder::new("Drifter")
        .characteristic("grit", Characteristic::new(2, "Grit: never quits"))
        .characteristic("charm", Characteristic::new(1, "Charm"))
        .characteristic("luck", Characteristic::new(1, "Luck"))
        .build()
}

fn with_uses(rank: u32, uses: u32) -> Characteristic {
    Characteristic {
        uses,
        ..Characteristic::new(rank, "")
    }
}

#[test]
fn cooldown_needs_two_distinct_others() {
    assert!(tap::is_disabled("A", &history(&["A", "B", "A"])));
    assert!(!tap::is_disabled("A", &history(&["A", "B", "C"])));
    assert!(tap::is_disabled("A", &history(&["A", "B", "B", "B"])));
    assert!(!tap::is_disabled("A", &history(&["B", "C"])));
    assert!(!tap::is_disabled("A", &history(&[])));
}

#[test]
fn rejected_tap_changes_nothing() {
    let mut character = drifter();
    tap::tap(&mut character, "grit", 20).unwrap();
    let before = character.clone();

    let err = tap::tap(&mut character, "grit", 20).unwrap_err();
    assert_eq!(
        err,
        RulesError::CooldownViolation {
            characteristic: "grit".to_string()
        }
    );
    assert_eq!(character, before);
}

#[test]
fn cooldown_clears_after_two_other_taps() {
    let mut character = drifter();
    tap::tap(&mut character, "grit", 20).unwrap();
    tap::tap(&mut character, "charm", 20).unwrap();
    assert!(character.characteristics["grit"].is_disabled);
    assert_eq!(tap::available(&character), vec!["luck"]);

    tap::tap(&mut character, "luck", 20).unwrap();
    assert!(!character.characteristics["grit"].is_disabled);

    let outcome = tap::tap(&mut character, "grit", 20).unwrap();
    assert_eq!(outcome.bonus, 2);
    assert_eq!(outcome.new_uses, 2);
    assert!(!outcome.can_advance_now);
    assert_eq!(character.tap_tracking.global_tap_counter, 4);
    assert_eq!(character.tap_tracking.last_tapped_char.as_deref(), Some("grit"));
}

#[test]
fn unknown_characteristic_is_reported() {
    let mut character = drifter();
    assert_eq!(
        tap::tap(&mut character, "swagger", 20),
        Err(RulesError::UnknownCharacteristic("swagger".to_string()))
    );
    assert!(character.tap_tracking.tap_history.is_empty());
}

#[test]
fn history_keeps_only_the_newest_entries() {
    let mut character = drifter();
    for name in ["grit", "charm", "luck", "grit", "charm", "luck"] {
        tap::tap(&mut character, name, 4).unwrap();
    }
    assert_eq!(
        character.tap_tracking.tap_history,
        history(&["luck", "grit", "charm", "luck"])
    );
    assert_eq!(character.tap_tracking.global_tap_counter, 6);
}

#[test]
fn advancement_success_raises_rank_and_resets_uses() {
    let mut character = CharacterBuilder::new("Ada")
        .characteristic("grit", with_uses(3, 30))
        .build();
    assert!(character.characteristics["grit"].can_advance);

    let mut dice = FixedDice::new([4]);
    let outcome = tap::attempt_advance(&mut character, "grit", &mut dice).unwrap();
    assert_eq!(
        outcome,
        AdvanceOutcome::Rolled {
            roll: 4,
            success: true,
            old_rank: 3,
            new_rank: 4,
        }
    );
    let grit = &character.characteristics["grit"];
    assert_eq!((grit.rank, grit.uses), (4, 0));
    assert!(!grit.can_advance);
}

#[test]
fn advancement_failure_still_resets_uses() {
    let mut character = CharacterBuilder::new("Ada")
        .characteristic("grit", with_uses(3, 34))
        .build();

    let mut dice = FixedDice::new([2]);
    let outcome = tap::attempt_advance(&mut character, "grit", &mut dice).unwrap();
    assert!(matches!(outcome, AdvanceOutcome::Rolled { success: false, new_rank: 3, .. }));
    let grit = &character.characteristics["grit"];
    assert_eq!((grit.rank, grit.uses), (3, 0));
}

#[test]
fn advancement_rolls_equal_to_rank_fail() {
    let mut character = CharacterBuilder::new("Ada")
        .characteristic("grit", with_uses(3, 30))
        .build();
    let mut dice = FixedDice::new([3]);
    let outcome = tap::attempt_advance(&mut character, "grit", &mut dice).unwrap();
    assert!(matches!(outcome, AdvanceOutcome::Rolled { success: false, .. }));
}

#[test]
fn advancement_preconditions_are_informational() {
    let mut character = CharacterBuilder::new("Ada")
        .characteristic("green", with_uses(2, 5))
        .characteristic("maxed", with_uses(10, 100))
        .build();
    let before = character.clone();
    let mut dice = FixedDice::new([6]);

    assert_eq!(
        tap::attempt_advance(&mut character, "green", &mut dice),
        Ok(AdvanceOutcome::NotReady {
            uses: 5,
            required: 20
        })
    );
    assert_eq!(
        tap::attempt_advance(&mut character, "maxed", &mut dice),
        Ok(AdvanceOutcome::MaxRank { rank: 10 })
    );
    assert_eq!(character, before);
    assert_eq!(dice.remaining(), 1);
}
