//! Destination and hotel catalogue.
//!
//! The library backs three binaries: `stayfinder-server` (the REST API),
//! `stayfinder` (a CLI client for that API) and `stayfinder-admin` (direct
//! database maintenance such as seeding).

pub mod client;
pub mod commands;
pub mod config;
pub mod db;
pub mod models;
pub mod seed;
pub mod server;
