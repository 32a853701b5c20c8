pub mod footprint;
pub mod observation;
pub mod observatory;
pub mod schedule;
pub mod user;
