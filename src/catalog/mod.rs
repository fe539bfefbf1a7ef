pub mod loader;
pub mod types;

pub use loader::{available_regions, load_region_catalog};
pub use types::{Candidate, CountryInfo, RegionCatalog};
