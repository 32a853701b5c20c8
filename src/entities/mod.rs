pub mod prelude;

pub mod footprints;
pub mod instruments;
pub mod observations;
pub mod observatories;
pub mod photometric_observations;
pub mod schedules;
pub mod spectroscopic_observations;
pub mod telescopes;
pub mod user_role_links;
pub mod user_roles;
pub mod users;
