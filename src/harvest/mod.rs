pub mod controller;
pub mod dates;
pub mod extract;
pub mod growth;
pub mod stagnation;
pub mod store;
pub mod types;

pub use controller::HarvestController;
pub use types::HarvestConfig;
