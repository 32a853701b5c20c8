pub mod reset_token;

pub mod identity_service;
pub mod identity_service_impl;
pub use identity_service::{IdentityError, IdentityService, TokenGrant};
pub use identity_service_impl::SeaOrmIdentityService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;
