use std::io::Read;

use crate::engine::Grid;
use crate::error::{EngineError, Result};
use crate::progress::Thresholds;
use crate::shop::{FurnitureItem, Room};

/// Tunable game rules. Every key is optional in TOML; missing keys fall
/// back to the values the game ships with.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Rules {
    #[serde(default = "defaults::board_size")]
    pub board_size: usize,

    /// Chance that a spawned tile is a 4 instead of a 2.
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,

    /// Sleepiness added per merged pair.
    #[serde(default = "defaults::merge_sleepiness")]
    pub merge_sleepiness: u64,
    /// Sleepiness added once per move that changes the grid.
    #[serde(default = "defaults::move_sleepiness")]
    pub move_sleepiness: u64,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub idle: Idle,

    #[serde(default)]
    pub room: Room,

    #[serde(default = "defaults::catalog")]
    pub furniture: Vec<FurnitureItem>,
}

/// Idle reward settings.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Idle {
    #[serde(default = "defaults::seconds_per_point")]
    pub seconds_per_point: u64,
    /// Idle points needed before a claim is offered while the game is still running.
    #[serde(default = "defaults::points_to_claim")]
    pub points_to_claim: u64,
    /// Flat bonus when claiming with the mochi asleep or stuck.
    #[serde(default = "defaults::game_over_bonus")]
    pub game_over_bonus: u64,
}

impl Default for Idle {
    fn default() -> Self {
        Self {
            seconds_per_point: defaults::seconds_per_point(),
            points_to_claim: defaults::points_to_claim(),
            game_over_bonus: defaults::game_over_bonus(),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            board_size: defaults::board_size(),
            four_probability: defaults::four_probability(),
            merge_sleepiness: defaults::merge_sleepiness(),
            move_sleepiness: defaults::move_sleepiness(),
            thresholds: Thresholds::default(),
            idle: Idle::default(),
            room: Room::default(),
            furniture: defaults::catalog(),
        }
    }
}

impl Rules {
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let rules: Self = toml::from_str(contents)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reject rule sets the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.board_size < 2 {
            return Err(EngineError::Config(format!(
                "board_size must be at least 2, got {}",
                self.board_size
            )));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(EngineError::Config(format!(
                "four_probability must be within [0, 1], got {}",
                self.four_probability
            )));
        }
        if self.thresholds.sleepy > self.thresholds.asleep {
            return Err(EngineError::Config(format!(
                "sleepy threshold {} is above asleep threshold {}",
                self.thresholds.sleepy, self.thresholds.asleep
            )));
        }
        if self.idle.seconds_per_point == 0 {
            return Err(EngineError::Config(
                "idle.seconds_per_point must be positive".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for item in &self.furniture {
            if !seen.insert(item.id.as_str()) {
                return Err(EngineError::Config(format!(
                    "furniture id {:?} listed twice",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// Look up a catalog entry by id.
    pub fn furniture_item(&self, id: &str) -> Option<&FurnitureItem> {
        self.furniture.iter().find(|item| item.id == id)
    }
}

mod defaults {
    use super::*;
    use crate::shop::Placement;

    pub fn board_size() -> usize { Grid::DEFAULT_SIZE }
    pub fn four_probability() -> f64 { 0.1 }
    pub fn merge_sleepiness() -> u64 { 5 }
    pub fn move_sleepiness() -> u64 { 1 }
    pub fn seconds_per_point() -> u64 { 10 }
    pub fn points_to_claim() -> u64 { 10 }
    pub fn game_over_bonus() -> u64 { 100 }

    pub fn catalog() -> Vec<FurnitureItem> {
        let item = |id: &str, name: &str, price: u64, top: u32, left: u32| FurnitureItem {
            id: id.to_string(),
            name: name.to_string(),
            price,
            placement: Placement { top, left },
            width: FurnitureItem::DEFAULT_SPRITE,
            height: FurnitureItem::DEFAULT_SPRITE,
        };
        vec![
            item("cushion", "Cushion", 250, 120, 50),
            item("table", "Table", 500, 100, 150),
            item("plant", "Potted plant", 400, 20, 220),
            item("futon", "Futon", 300, 150, 100),
            item("lamp", "Lamp", 350, 50, 20),
            item("bookshelf", "Bookshelf", 800, 0, 0),
            item("rug", "Fluffy rug", 600, 180, 80),
            item("curtain", "Blackout curtain", 750, 0, 100),
            item("bedside_table", "Bedside table", 450, 130, 200),
            item("wall_art", "Wall art", 550, 30, 180),
            item("beanbag", "Beanbag", 700, 160, 20),
            item("hammock", "Hammock", 900, 80, 120),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let rules = Rules::from_toml_str("").unwrap();
        assert_eq!(rules, Rules::default());
        assert_eq!(rules.board_size, 4);
        assert_eq!(rules.thresholds.sleepy, 2501);
        assert_eq!(rules.thresholds.asleep, 5000);
        assert_eq!(rules.furniture.len(), 12);
        assert_eq!(rules.furniture_item("hammock").map(|i| i.price), Some(900));
    }

    #[test]
    fn partial_toml_overrides() {
        let rules = Rules::from_toml_str(
            r#"
            board_size = 5
            move_sleepiness = 0

            [thresholds]
            sleepy = 10
            asleep = 20

            [idle]
            game_over_bonus = 7
            "#,
        )
        .unwrap();
        assert_eq!(rules.board_size, 5);
        assert_eq!(rules.move_sleepiness, 0);
        assert_eq!(rules.merge_sleepiness, 5);
        assert_eq!(rules.thresholds, Thresholds { sleepy: 10, asleep: 20 });
        assert_eq!(rules.idle.game_over_bonus, 7);
        assert_eq!(rules.idle.seconds_per_point, 10);
    }

    #[test]
    fn custom_catalog_replaces_default() {
        let rules = Rules::from_toml_str(
            r#"
            [[furniture]]
            id = "stool"
            name = "Stool"
            price = 5
            placement = { top = 1, left = 2 }
            "#,
        )
        .unwrap();
        assert_eq!(rules.furniture.len(), 1);
        assert_eq!(rules.furniture[0].width, FurnitureItem::DEFAULT_SPRITE);
    }

    #[test]
    fn invalid_rules_are_rejected() {
        for bad in [
            "board_size = 1",
            "four_probability = 1.5",
            "[thresholds]\nsleepy = 10\nasleep = 5",
            "[idle]\nseconds_per_point = 0",
        ] {
            let err = Rules::from_toml_str(bad).unwrap_err();
            assert!(matches!(err, EngineError::Config(_)), "{bad}: {err}");
        }
        assert!(matches!(
            Rules::from_toml_str("board_size = \"big\""),
            Err(EngineError::RulesFormat(_))
        ));
    }

    #[test]
    fn duplicate_furniture_ids_are_rejected() {
        let mut rules = Rules::default();
        rules.furniture.push(rules.furniture[0].clone());
        assert!(rules.validate().is_err());
    }
}
