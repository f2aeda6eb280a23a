// Dice service: "NdS" expressions rolled against an injectable die source.
use crate::error::RulesError;
use rand::Rng; // RNG utilities from the rand crate for generating random numbers.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

// Anything that can produce a single die face.
pub trait DieSource {
    // Returns a face drawn from `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

// Die source backed by a rand generator.
#[derive(Debug, Clone)]
pub struct RandomDice<R: Rng> {
    rng: R,
}

impl RandomDice<rand::rngs::ThreadRng> {
    // Dice drawn from the thread-local generator.
    pub fn thread() -> Self {
        Self { rng: rand::rng() }
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DieSource for RandomDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

// Replays a scripted sequence of faces, in order.
// Faces are clamped into the die's range. Once the script runs dry every
// further die shows 1.
#[derive(Debug, Clone, Default)]
pub struct FixedDice {
    faces: VecDeque<u32>,
}

impl FixedDice {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    // Number of scripted faces not consumed yet.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DieSource for FixedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        match self.faces.pop_front() {
            Some(face) => face.clamp(1, sides.max(1)),
            None => {
                log::warn!("FixedDice exhausted, rolling 1 on a d{sides}");
                1
            }
        }
    }
}

// Largest pool and die an expression may name.
pub const MAX_DICE: u32 = 100;
pub const MAX_SIDES: u32 = 1000;

// A parsed "NdS" expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
}

impl DiceExpr {
    pub const D4: DiceExpr = DiceExpr::new(1, 4);
    pub const D6: DiceExpr = DiceExpr::new(1, 6);
    pub const D12: DiceExpr = DiceExpr::new(1, 12);
    pub const D20: DiceExpr = DiceExpr::new(1, 20);

    pub const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

impl FromStr for DiceExpr {
    type Err = RulesError;

    // Accepts "3d6", "1D12", " d20 " (count defaults to one).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RulesError::InvalidDiceExpression(s.to_string());
        let trimmed = s.trim().to_lowercase();
        let (count, sides) = trimmed.split_once('d').ok_or_else(invalid)?;

        let count = match count.trim() {
            "" => 1,
            n => n.parse::<u32>().map_err(|_| invalid())?,
        };
        let sides = sides.trim().parse::<u32>().map_err(|_| invalid())?;

        if !(1..=MAX_DICE).contains(&count) || !(1..=MAX_SIDES).contains(&sides) {
            return Err(invalid());
        }
        Ok(DiceExpr::new(count, sides))
    }
}

// Outcome of rolling one expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub formula: String,
    pub rolls: Vec<u32>,
    pub total: i32,
}

// Roll every die of the expression independently and sum the faces.
pub fn roll_expr(dice: &mut dyn DieSource, expr: DiceExpr) -> DiceRoll {
    let count = expr.count.min(MAX_DICE);
    if count < expr.count {
        log::warn!("{expr} exceeds the {MAX_DICE} dice limit, rolling {count}");
    }
    let rolls: Vec<u32> = (0..count).map(|_| dice.roll_die(expr.sides)).collect();
    let total: i64 = rolls.iter().map(|&face| i64::from(face)).sum();
    let total = i32::try_from(total).unwrap_or(i32::MAX);
    log::debug!("Rolled {expr}: {rolls:?} = {total}");

    DiceRoll {
        formula: expr.to_string(),
        rolls,
        total,
    }
}

// Parse then roll.
pub fn roll_str(dice: &mut dyn DieSource, formula: &str) -> Result<DiceRoll, RulesError> {
    let expr: DiceExpr = formula.parse()?;
    Ok(roll_expr(dice, expr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_common_forms() {
        assert_eq!("3d6".parse::<DiceExpr>(), Ok(DiceExpr::new(3, 6)));
        assert_eq!(" 1D12 ".parse::<DiceExpr>(), Ok(DiceExpr::D12));
        assert_eq!("d20".parse::<DiceExpr>(), Ok(DiceExpr::D20));
    }

    #[test]
    fn rejects_garbage() {
        for bad in [
            "", "6", "0d6", "2d0", "xd6", "2d", "1d6+1", "101d6", "1d1001", "4000000000d6",
            "1d3000000000",
        ] {
            assert!(
                matches!(bad.parse::<DiceExpr>(), Err(RulesError::InvalidDiceExpression(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn limits_are_inclusive() {
        assert_eq!("100d1000".parse::<DiceExpr>(), Ok(DiceExpr::new(100, 1000)));
    }

    #[test]
    fn oversized_expressions_roll_capped_and_stay_positive() {
        let mut dice = FixedDice::new([u32::MAX; 3]);
        let roll = roll_expr(&mut dice, DiceExpr::new(3, u32::MAX));
        assert_eq!(roll.total, i32::MAX);

        let mut dice = FixedDice::new([]);
        let roll = roll_expr(&mut dice, DiceExpr::new(4_000_000_000, 6));
        assert_eq!(roll.rolls.len(), MAX_DICE as usize);
    }

    #[test]
    fn fixed_dice_sum_in_order() {
        let mut dice = FixedDice::new([2, 5, 6]);
        let roll = roll_expr(&mut dice, DiceExpr::new(3, 6));
        assert_eq!(roll.rolls, vec![2, 5, 6]);
        assert_eq!(roll.total, 13);
        assert_eq!(roll.formula, "3d6");
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn fixed_dice_clamp_to_die_size() {
        let mut dice = FixedDice::new([9, 0]);
        assert_eq!(dice.roll_die(4), 4);
        assert_eq!(dice.roll_die(4), 1);
        assert_eq!(dice.roll_die(4), 1);
    }

    #[test]
    fn random_faces_stay_in_range() {
        let mut dice = RandomDice::new(StdRng::seed_from_u64(7));
        for _ in 0..500 {
            let face = dice.roll_die(12);
            assert!((1..=12).contains(&face));
        }
    }
}
