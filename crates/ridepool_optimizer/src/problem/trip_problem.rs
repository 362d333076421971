use fxhash::FxHashSet;

use super::{
    arrangement::{Arrangement, ArrangementIdx},
    passenger::{Passenger, PassengerIdx},
};

/// One trip's worth of input: every passenger needing a ride and every
/// vehicle leg available to carry them. Passengers referenced from an
/// arrangement path are pre-assigned; the rest form the unassigned pool.
pub struct TripProblem {
    passengers: Vec<Passenger>,
    arrangements: Vec<Arrangement>,
}

impl TripProblem {
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn passenger(&self, index: PassengerIdx) -> &Passenger {
        &self.passengers[index]
    }

    pub fn arrangements(&self) -> &[Arrangement] {
        &self.arrangements
    }

    pub fn arrangement(&self, index: ArrangementIdx) -> &Arrangement {
        &self.arrangements[index]
    }

    pub(crate) fn arrangement_mut(&mut self, index: ArrangementIdx) -> &mut Arrangement {
        &mut self.arrangements[index]
    }

    /// Passengers not yet riding in any arrangement, in insertion order.
    pub fn unassigned_passengers(&self) -> Vec<PassengerIdx> {
        let assigned: FxHashSet<PassengerIdx> = self
            .arrangements
            .iter()
            .flat_map(|arrangement| arrangement.path().iter().copied())
            .collect();

        (0..self.passengers.len())
            .map(PassengerIdx::new)
            .filter(|index| !assigned.contains(index))
            .collect()
    }
}

#[derive(Default)]
pub struct TripProblemBuilder {
    passengers: Option<Vec<Passenger>>,
    arrangements: Option<Vec<Arrangement>>,
}

impl TripProblemBuilder {
    pub fn set_passengers(&mut self, passengers: Vec<Passenger>) -> &mut TripProblemBuilder {
        self.passengers = Some(passengers);
        self
    }

    pub fn add_passenger(&mut self, passenger: Passenger) -> &mut TripProblemBuilder {
        if let Some(passengers) = &mut self.passengers {
            passengers.push(passenger);
        } else {
            self.passengers = Some(vec![passenger]);
        }

        self
    }

    pub fn set_arrangements(&mut self, arrangements: Vec<Arrangement>) -> &mut TripProblemBuilder {
        self.arrangements = Some(arrangements);
        self
    }

    pub fn add_arrangement(&mut self, arrangement: Arrangement) -> &mut TripProblemBuilder {
        if let Some(arrangements) = &mut self.arrangements {
            arrangements.push(arrangement);
        } else {
            self.arrangements = Some(vec![arrangement]);
        }

        self
    }

    pub fn build(self) -> TripProblem {
        let passengers = self.passengers.unwrap_or_default();
        let arrangements = self.arrangements.unwrap_or_default();

        let mut assigned: FxHashSet<PassengerIdx> = FxHashSet::default();
        for arrangement in arrangements.iter() {
            for &index in arrangement.path() {
                if index.get() >= passengers.len() {
                    panic!("Path passenger index must be within the range of passengers");
                }

                if !assigned.insert(index) {
                    panic!("Passenger {index} is pre-assigned to more than one arrangement");
                }
            }
        }

        TripProblem {
            passengers,
            arrangements,
        }
    }
}
