// Parties module: customers and suppliers

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Customer, PartyInput, Supplier};
pub use repositories::PartyRepository;
pub use services::PartyService;
