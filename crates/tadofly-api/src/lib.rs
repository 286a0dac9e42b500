// tadofly-api: Async Rust client for the Tado cloud thermostat API.
//
// The core is the `Connection`: OAuth2 device-authorization activation,
// token refresh with clock-skew handling, and a bounded-retry dispatcher
// addressing two backend API generations through one request model. The
// `my` and `hops` modules are the per-dialect domain layers on top.

pub mod activation;
pub mod client;
pub mod error;
pub mod home;
pub mod hops;
pub mod my;
pub mod request;
pub mod token;
pub mod transport;

pub use activation::ActivationStatus;
pub use client::{CLIENT_ID_DEVICE, Connection, ConnectionConfig};
pub use error::Error;
pub use home::HomeApi;
pub use hops::HopsClient;
pub use my::MyClient;
pub use request::{Action, ApiRequest, Domain, Endpoint, EndpointUrls, Generation, Mode};
pub use token::TokenStore;
pub use transport::TransportConfig;
