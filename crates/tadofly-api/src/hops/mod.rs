// Domain client for LINE_X homes (hops.tado.com).

pub mod client;
pub mod models;

pub use client::HopsClient;
