//! Mail bundles carried between worlds of different importance

use crate::data::tables::MAIL_IMPORTANCE_MARGIN;
use crate::models::starship::ShipError;
use crate::models::world::World;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailBundle {
    serial: Uuid,
    origin: String,
    destination: String,
}

impl MailBundle {
    /// Mail flows from important worlds to much less important ones
    ///
    /// # Errors
    /// `ShipError::NoMailForRoute` unless the origin's importance exceeds the
    /// destination's by more than two.
    pub fn new(origin: &World, destination: &World) -> Result<Self, ShipError> {
        if origin.importance() <= destination.importance() + MAIL_IMPORTANCE_MARGIN {
            return Err(ShipError::NoMailForRoute {
                origin: origin.name().to_string(),
                destination: destination.name().to_string(),
            });
        }
        Ok(Self {
            serial: Uuid::new_v4(),
            origin: origin.name().to_string(),
            destination: destination.name().to_string(),
        })
    }

    pub fn serial(&self) -> Uuid {
        self.serial
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}
