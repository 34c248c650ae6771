#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Contains the domain models, authentication mechanisms, ownership-scoped task"]
#![doc = "services, routing configuration, and error handling for the TaskTrack API."]
#![doc = "The main binary (`main.rs`) uses this crate to construct and run the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
