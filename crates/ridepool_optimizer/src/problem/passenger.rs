use serde::Serialize;

use crate::define_index_newtype;

use super::location::LocationId;

define_index_newtype!(PassengerIdx, Passenger);

#[derive(Serialize, Debug, Clone)]
pub struct Passenger {
    external_id: String,
    location: LocationId,
}

impl Passenger {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location(&self) -> LocationId {
        self.location
    }
}

#[derive(Default)]
pub struct PassengerBuilder {
    external_id: Option<String>,
    location: Option<LocationId>,
}

impl PassengerBuilder {
    pub fn set_external_id(&mut self, external_id: String) -> &mut PassengerBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_location(&mut self, location: LocationId) -> &mut PassengerBuilder {
        self.location = Some(location);
        self
    }

    pub fn build(self) -> Passenger {
        Passenger {
            external_id: self.external_id.expect("External ID is required"),
            location: self.location.expect("Location is required"),
        }
    }
}
