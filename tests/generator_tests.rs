use bite_the_bullet::dice::{FixedDice, RandomDice};
use bite_the_bullet::generator::{self, BOND, generate_character};
use bite_the_bullet::item::{ArmorType, ItemKind, Uses};
use bite_the_bullet::{Attribute, Settings};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn scripted_generation_follows_the_tables() {
    let faces = [
        3, 3, 3, // vigor
        4, 4, 4, // presence
        6, 6, 6, // faith
        3, 4, // sand
        1, 2, 3, 4, 10, // background, reputation, fortitude, foible, issue
        5,  // armor
        1,  // weapon
        1, 2, 20, // gear
        3,  // lead
        6,  // coin
    ];
    let mut dice = FixedDice::new(faces);
    let character = generate_character("Hollis", &mut dice, &Settings::default());
    assert_eq!(dice.remaining(), 0);

    assert_eq!(character.attribute(Attribute::Vigor), 9);
    assert_eq!(character.attribute(Attribute::Presence), 12);
    assert_eq!(character.attribute(Attribute::Faith), 18);
    assert_eq!(character.resources.sand.value, 7);
    assert_eq!(character.resources.sand.max, 7);
    assert_eq!(character.money, 6);

    assert_eq!(character.characteristics.len(), 6);
    assert_eq!(
        character.characteristics["background"].description,
        "Mine-born: You grew up underground. Tough as bedrock and wary of collapse."
    );
    assert_eq!(
        character.characteristics["issue"].description,
        "Afraid to love again: You keep everyone at the far end of your reach."
    );
    assert!(character.characteristics[BOND].description.is_empty());
    assert!(
        character
            .characteristics
            .values()
            .all(|c| c.rank == 1 && c.uses == 0)
    );

    let names: Vec<&str> = character.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(
        names,
        ["Bone-ward fetish", "Revolver", "Tinderbox", "Canteen", "Goggles", "Lead"]
    );
    let ward = character.items[0].as_armor().unwrap();
    assert_eq!(ward.armor_type, ArmorType::Fetish);
    assert!(character.items[1].as_weapon().unwrap().properties.is_gun);
    let ItemKind::Gear(lead) = &character.items[5].kind else {
        panic!("lead should be gear");
    };
    assert_eq!(lead.uses, Some(Uses { value: 4, max: 4 }));

    assert_eq!(character.resources.load, 5);
    assert_eq!(character.resources.inventory, 10);
    assert_eq!(character.resources.reserve.value, 5);
}

#[test]
fn melee_starts_without_lead() {
    let faces = [
        2, 2, 2, 5, 5, 5, 1, 1, 1, 6, 6, // attributes and sand
        5, 5, 5, 5, 5, // characteristics
        2, // Rancher's vest
        4, // Knife
        4, 7, 19, // gear
        1, // coin
    ];
    let mut dice = FixedDice::new(faces);
    let character = generate_character("Knifeman", &mut dice, &Settings::default());
    assert_eq!(dice.remaining(), 0);
    assert_eq!(character.money, 1);
    assert!(character.items.iter().all(|item| item.name != "Lead"));

    let vest = character.items[0].as_armor().unwrap();
    assert_eq!((vest.armor_type, vest.value), (ArmorType::Light, 2));
    assert_eq!(character.items[1].name, "Knife");
    assert_eq!(character.resources.sand.value, 12);
}

#[test]
fn random_characters_stay_in_range() {
    let mut dice = RandomDice::new(StdRng::seed_from_u64(1874));
    for _ in 0..50 {
        let character = generate_character("Stranger", &mut dice, &Settings::default());
        for attribute in [Attribute::Vigor, Attribute::Presence, Attribute::Faith] {
            assert!((3..=18).contains(&character.attribute(attribute)));
        }
        assert!((2..=12).contains(&character.resources.sand.value));
        assert!((1..=6).contains(&character.money));
        assert!(character.items.len() == 5 || character.items.len() == 6);
        assert!(
            character
                .characteristics
                .keys()
                .all(|name| name == BOND
                    || generator::CHARACTERISTIC_TABLES
                        .iter()
                        .any(|(table, _)| table == name))
        );
    }
}
