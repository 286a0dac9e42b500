// Domain client for pre-LINE_X homes (my.tado.com).

pub mod client;
pub mod models;

pub use client::MyClient;
