pub mod arrangement;
pub mod distance_table;
pub mod location;
pub mod oracle;
pub mod passenger;
pub mod trip_problem;
