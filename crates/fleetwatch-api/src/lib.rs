// fleetwatch-api: Async Rust clients for vehicle-tracking vendor APIs
//
// Two vendor surfaces share an error taxonomy and transport config:
// `tracking` (documented REST/JSON API, query-string sessions) and
// `mobility` (unofficial portal, cookie sessions + HTML fragments).

pub mod error;
pub mod mobility;
pub mod tracking;
pub mod transport;

pub use error::Error;
pub use mobility::MobilityClient;
pub use tracking::TrackingClient;
pub use transport::TransportConfig;
