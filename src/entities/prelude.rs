pub use super::footprints::Entity as Footprints;
pub use super::instruments::Entity as Instruments;
pub use super::observations::Entity as Observations;
pub use super::observatories::Entity as Observatories;
pub use super::photometric_observations::Entity as PhotometricObservations;
pub use super::schedules::Entity as Schedules;
pub use super::spectroscopic_observations::Entity as SpectroscopicObservations;
pub use super::telescopes::Entity as Telescopes;
pub use super::user_role_links::Entity as UserRoleLinks;
pub use super::user_roles::Entity as UserRoles;
pub use super::users::Entity as Users;
