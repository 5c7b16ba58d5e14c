//! Crew members and passengers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Skills a character may hold
pub const KNOWN_SKILLS: &[&str] = &[
    "admin",
    "astrogator",
    "broker",
    "engineer",
    "gunner",
    "leader",
    "liaison",
    "medic",
    "pilot",
    "sensors",
    "steward",
    "streetwise",
    "trader",
    "vacc suit",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NpcError {
    #[error("Unknown skill '{0}'")]
    UnknownSkill(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcStatus {
    Alive,
    Dead,
}

/// A named character with skills
///
/// # Example
/// ```
/// use t5sim_core::Npc;
///
/// let mut medic = Npc::new("Doc Varga", "Rhylanor");
/// medic.set_skill("medic", 2).unwrap();
/// assert_eq!(medic.skill("medic"), 2);
/// assert_eq!(medic.skill("pilot"), 0);
/// assert!(medic.set_skill("juggling", 1).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    name: String,
    serial: Uuid,
    location: String,
    skills: BTreeMap<String, u8>,
    status: NpcStatus,
}

impl PartialEq for Npc {
    fn eq(&self, other: &Self) -> bool {
        self.serial == other.serial
    }
}

impl Npc {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serial: Uuid::new_v4(),
            location: location.into(),
            skills: BTreeMap::new(),
            status: NpcStatus::Alive,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serial(&self) -> Uuid {
        self.serial
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn update_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn set_skill(&mut self, skill: &str, level: u8) -> Result<(), NpcError> {
        let skill = skill.to_lowercase();
        if !KNOWN_SKILLS.contains(&skill.as_str()) {
            return Err(NpcError::UnknownSkill(skill));
        }
        self.skills.insert(skill, level);
        Ok(())
    }

    /// Skill level, zero if untrained
    pub fn skill(&self, skill: &str) -> u8 {
        self.skills.get(skill).copied().unwrap_or(0)
    }

    pub fn skills(&self) -> &BTreeMap<String, u8> {
        &self.skills
    }

    pub fn status(&self) -> NpcStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == NpcStatus::Alive
    }

    pub fn kill(&mut self) {
        self.status = NpcStatus::Dead;
    }
}
