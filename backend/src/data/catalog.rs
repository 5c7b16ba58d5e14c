//! World map and ship class catalogue
//!
//! The default catalogue ships inside the library as JSON; callers may load
//! their own map or ship classes from JSON text instead.

use super::DataError;
use crate::models::ship_class::{filter_by_roles, validate_role_frequencies, ShipClass, ShipRole};
use crate::models::world::{World, WorldRecord};
use std::collections::BTreeMap;

const EMBEDDED_WORLDS: &str = include_str!("../../data/worlds.json");
const EMBEDDED_SHIP_CLASSES: &str = include_str!("../../data/ship_classes.json");

/// Parse a JSON array of world records
pub fn load_worlds_json(json: &str) -> Result<Vec<World>, DataError> {
    let records: Vec<WorldRecord> = serde_json::from_str(json).map_err(|e| DataError::Parse {
        what: "world",
        message: e.to_string(),
    })?;
    records.into_iter().map(World::try_from).collect()
}

/// Parse a JSON array of ship classes and check each one
pub fn load_ship_classes_json(json: &str) -> Result<Vec<ShipClass>, DataError> {
    let classes: Vec<ShipClass> = serde_json::from_str(json).map_err(|e| DataError::Parse {
        what: "ship class",
        message: e.to_string(),
    })?;
    for class in &classes {
        class.validate()?;
    }
    Ok(classes)
}

/// Everything the agents need to know about the universe
#[derive(Debug, Clone)]
pub struct GameContext {
    worlds: BTreeMap<String, World>,
    ship_classes: Vec<ShipClass>,
}

impl GameContext {
    /// Build a catalogue, rejecting duplicate names and empty inputs
    pub fn new(worlds: Vec<World>, ship_classes: Vec<ShipClass>) -> Result<Self, DataError> {
        if worlds.is_empty() {
            return Err(DataError::Empty("worlds"));
        }
        if ship_classes.is_empty() {
            return Err(DataError::Empty("ship classes"));
        }
        let mut by_name = BTreeMap::new();
        for world in worlds {
            let name = world.name().to_string();
            if by_name.insert(name.clone(), world).is_some() {
                return Err(DataError::Duplicate { kind: "world", name });
            }
        }
        for (i, class) in ship_classes.iter().enumerate() {
            class.validate()?;
            if ship_classes[..i]
                .iter()
                .any(|other| other.class_name == class.class_name)
            {
                return Err(DataError::Duplicate {
                    kind: "ship class",
                    name: class.class_name.clone(),
                });
            }
        }
        Ok(Self {
            worlds: by_name,
            ship_classes,
        })
    }

    /// Parse both files and check per-role frequency totals
    pub fn from_json(worlds_json: &str, ship_classes_json: &str) -> Result<Self, DataError> {
        let worlds = load_worlds_json(worlds_json)?;
        let classes = load_ship_classes_json(ship_classes_json)?;
        validate_role_frequencies(&classes)?;
        Self::new(worlds, classes)
    }

    /// The built-in subsector map and ship designs
    pub fn embedded() -> Result<Self, DataError> {
        Self::from_json(EMBEDDED_WORLDS, EMBEDDED_SHIP_CLASSES)
    }

    pub fn embedded_worlds_json() -> &'static str {
        EMBEDDED_WORLDS
    }

    pub fn embedded_ship_classes_json() -> &'static str {
        EMBEDDED_SHIP_CLASSES
    }

    /// Same map with ship classes restricted to `roles` (all when empty)
    pub fn with_roles(&self, roles: &[ShipRole]) -> Result<Self, DataError> {
        Ok(Self {
            worlds: self.worlds.clone(),
            ship_classes: filter_by_roles(&self.ship_classes, roles)?,
        })
    }

    pub fn world(&self, name: &str) -> Result<&World, DataError> {
        self.worlds
            .get(name)
            .ok_or_else(|| DataError::UnknownWorld(name.to_string()))
    }

    /// Worlds in name order
    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.values()
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    pub fn ship_classes(&self) -> &[ShipClass] {
        &self.ship_classes
    }

    pub fn ship_class(&self, name: &str) -> Result<&ShipClass, DataError> {
        self.ship_classes
            .iter()
            .find(|c| c.class_name == name)
            .ok_or_else(|| DataError::UnknownShipClass(name.to_string()))
    }

    /// Other worlds within `jump_rating` parsecs of `origin`, in name order
    pub fn worlds_in_jump_range(
        &self,
        origin: &str,
        jump_rating: u32,
    ) -> Result<Vec<&World>, DataError> {
        let here = self.world(origin)?;
        Ok(self
            .worlds
            .values()
            .filter(|w| w.name() != here.name() && here.distance_to(w) <= jump_rating)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalogue_loads() {
        let ctx = GameContext::embedded().unwrap();
        assert!(ctx.world_count() >= 15);
        assert!(ctx.ship_class("Free Trader").is_ok());
        assert!(ctx.world("Rhylanor").is_ok());
    }

    #[test]
    fn test_jump_range_excludes_origin() {
        let ctx = GameContext::embedded().unwrap();
        let near = ctx.worlds_in_jump_range("Rhylanor", 1).unwrap();
        assert!(!near.is_empty());
        assert!(near.iter().all(|w| w.name() != "Rhylanor"));
        let rhylanor = ctx.world("Rhylanor").unwrap();
        assert!(near.iter().all(|w| rhylanor.distance_to(w) <= 1));
    }

    #[test]
    fn test_unknown_world_is_error() {
        let ctx = GameContext::embedded().unwrap();
        assert_eq!(
            ctx.world("Nowhere").unwrap_err(),
            DataError::UnknownWorld("Nowhere".to_string())
        );
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"[{ "class_name": "Husk", "role": "civilian", "frequency": 1.0 }]"#;
        assert!(matches!(
            load_ship_classes_json(json),
            Err(DataError::Parse { what: "ship class", .. })
        ));
    }
}
