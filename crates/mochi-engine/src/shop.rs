//! Furniture catalog, purchases and placement inside the mochi's room.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::progress::Progress;

/// Top-left corner of a sprite in room pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Placement {
    pub top: u32,
    pub left: u32,
}

/// Size of the room furniture is dragged around in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    pub width: u32,
    pub height: u32,
}

impl Default for Room {
    fn default() -> Self {
        Room {
            width: 300,
            height: 240,
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: String,
    pub name: String,
    pub price: u64,
    /// Where the item lands right after purchase.
    pub placement: Placement,
    #[serde(default = "FurnitureItem::default_sprite")]
    pub width: u32,
    #[serde(default = "FurnitureItem::default_sprite")]
    pub height: u32,
}

impl FurnitureItem {
    pub const DEFAULT_SPRITE: u32 = 48;

    fn default_sprite() -> u32 {
        Self::DEFAULT_SPRITE
    }
}

impl Room {
    /// Clamp `wanted` so the whole sprite stays inside the room.
    pub fn clamp(&self, item: &FurnitureItem, wanted: Placement) -> Placement {
        let max_left = self.width.saturating_sub(item.width);
        let max_top = self.height.saturating_sub(item.height);
        Placement {
            top: wanted.top.min(max_top),
            left: wanted.left.min(max_left),
        }
    }
}

/// Owned furniture keyed by catalog id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Furniture {
    owned: BTreeMap<String, Placement>,
}

impl Furniture {
    pub fn from_owned(owned: BTreeMap<String, Placement>) -> Self {
        Furniture { owned }
    }

    pub fn owned(&self) -> &BTreeMap<String, Placement> {
        &self.owned
    }

    pub fn is_owned(&self, id: &str) -> bool {
        self.owned.contains_key(id)
    }

    /// Buy `item`, paying from `progress`. The item appears at its catalog placement.
    pub fn purchase(&mut self, item: &FurnitureItem, progress: &mut Progress) -> Result<Placement> {
        if self.is_owned(&item.id) {
            return Err(EngineError::AlreadyOwned(item.id.clone()));
        }
        if !progress.spend(item.price) {
            return Err(EngineError::InsufficientPoints {
                price: item.price,
                available: progress.currency(),
            });
        }
        self.owned.insert(item.id.clone(), item.placement);
        info!("bought {} for {} healing points", item.id, item.price);
        Ok(item.placement)
    }

    /// Move an owned item, keeping it inside `room`.
    pub fn place(&mut self, item: &FurnitureItem, wanted: Placement, room: &Room) -> Result<Placement> {
        let slot = self
            .owned
            .get_mut(&item.id)
            .ok_or_else(|| EngineError::UnknownFurniture(item.id.clone()))?;
        *slot = room.clamp(item, wanted);
        Ok(*slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Thresholds;

    fn lamp() -> FurnitureItem {
        FurnitureItem {
            id: "lamp".into(),
            name: "Lamp".into(),
            price: 350,
            placement: Placement { top: 50, left: 20 },
            width: 40,
            height: 60,
        }
    }

    #[test]
    fn purchase_deducts_and_places() {
        let mut progress = Progress::new(400, Thresholds::default());
        let mut furniture = Furniture::default();
        let placed = furniture.purchase(&lamp(), &mut progress).unwrap();
        assert_eq!(placed, Placement { top: 50, left: 20 });
        assert_eq!(progress.currency(), 50);
        assert!(furniture.is_owned("lamp"));
    }

    #[test]
    fn purchase_refusals_leave_state_alone() {
        let mut progress = Progress::new(100, Thresholds::default());
        let mut furniture = Furniture::default();
        let err = furniture.purchase(&lamp(), &mut progress).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientPoints {
                price: 350,
                available: 100
            }
        ));
        assert_eq!(progress.currency(), 100);
        assert!(!furniture.is_owned("lamp"));

        progress.earn(1000);
        furniture.purchase(&lamp(), &mut progress).unwrap();
        let err = furniture.purchase(&lamp(), &mut progress).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyOwned(_)));
        assert_eq!(progress.currency(), 750);
    }

    #[test]
    fn place_clamps_into_room() {
        let mut progress = Progress::new(1000, Thresholds::default());
        let mut furniture = Furniture::default();
        let room = Room {
            width: 300,
            height: 240,
        };
        furniture.purchase(&lamp(), &mut progress).unwrap();
        let at = furniture
            .place(&lamp(), Placement { top: 500, left: 10 }, &room)
            .unwrap();
        assert_eq!(at, Placement { top: 180, left: 10 });
        let at = furniture
            .place(&lamp(), Placement { top: 0, left: 999 }, &room)
            .unwrap();
        assert_eq!(at, Placement { top: 0, left: 260 });
        assert_eq!(furniture.owned()["lamp"], at);
    }

    #[test]
    fn place_requires_ownership() {
        let mut furniture = Furniture::default();
        let err = furniture
            .place(&lamp(), Placement::default(), &Room::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownFurniture(_)));
    }
}
