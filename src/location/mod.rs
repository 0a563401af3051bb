//! Location resolution subsystem.
//!
//! Turns tagged place-name spans into a prefecture/city/town hierarchy,
//! composes a geocoding query from it, and looks the query up against
//! the GSI address search service with a local cache in front.

pub mod cache;
pub mod providers;
pub mod query;
pub mod resolver;
pub mod types;

pub use cache::{CachedGeocoder, GeocodeCache};
pub use providers::{Geocoder, GsiGeocoder, GSI_ADDRESS_SEARCH_URL};
pub use query::{compose, GeocodeQuery};
pub use resolver::{LocationResolver, DEFAULT_TARGET_LABELS};
pub use types::{Coordinate, GeocodeError, LocationType, PlaceHierarchy, TaggedSpan};
