use serde::Serialize;
use smallvec::SmallVec;

use crate::define_index_newtype;

use super::{location::LocationId, passenger::PassengerIdx};

define_index_newtype!(ArrangementIdx, Arrangement);

/// Riders in pickup order, origin and destination excluded. Inline capacity
/// sized for common vehicles; larger arrangements spill to the heap.
pub type Path = SmallVec<[PassengerIdx; 8]>;

/// One vehicle leg of a trip: where it starts, where it ends, how many seats
/// it has, and who currently rides in it (in pickup order).
#[derive(Serialize, Debug, Clone)]
pub struct Arrangement {
    external_id: String,
    origin: LocationId,
    destination: LocationId,
    capacity: usize,
    path: Path,
}

impl Arrangement {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn origin(&self) -> LocationId {
        self.origin
    }

    pub fn destination(&self) -> LocationId {
        self.destination
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> &[PassengerIdx] {
        &self.path
    }

    pub fn is_full(&self) -> bool {
        self.path.len() >= self.capacity
    }

    pub fn seats_left(&self) -> usize {
        self.capacity.saturating_sub(self.path.len())
    }

    pub(crate) fn set_path(&mut self, path: Path) {
        self.path = path;
    }
}

#[derive(Default)]
pub struct ArrangementBuilder {
    external_id: Option<String>,
    origin: Option<LocationId>,
    destination: Option<LocationId>,
    capacity: Option<usize>,
    path: Option<Vec<PassengerIdx>>,
}

impl ArrangementBuilder {
    pub fn set_external_id(&mut self, external_id: String) -> &mut ArrangementBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_origin(&mut self, origin: LocationId) -> &mut ArrangementBuilder {
        self.origin = Some(origin);
        self
    }

    pub fn set_destination(&mut self, destination: LocationId) -> &mut ArrangementBuilder {
        self.destination = Some(destination);
        self
    }

    pub fn set_capacity(&mut self, capacity: usize) -> &mut ArrangementBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_path(&mut self, path: Vec<PassengerIdx>) -> &mut ArrangementBuilder {
        self.path = Some(path);
        self
    }

    pub fn build(self) -> Arrangement {
        Arrangement {
            external_id: self.external_id.expect("External ID is required"),
            origin: self.origin.expect("Origin location is required"),
            destination: self.destination.expect("Destination location is required"),
            capacity: self.capacity.expect("Capacity is required"),
            path: Path::from_vec(self.path.unwrap_or_default()),
        }
    }
}
