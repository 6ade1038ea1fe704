//! Domain search storefront backed by a registrar proxy, with an animated
//! world map of simulated network pings.
//!
//! - [`server`] relays availability, TLD and purchase calls to the registrar
//! - [`search`] is the storefront side: input cleanup, results, cart
//! - [`ping`] is the ping lifecycle (spawn policy, phase timing)
//! - [`map`] draws the pings over a braille world map in the terminal

pub mod colors;
pub mod config;
pub mod error;
pub mod geo;
pub mod locations;
pub mod map;
pub mod ping;
pub mod registrar;
pub mod search;
pub mod server;
pub mod settings;
pub mod terminal;

pub use error::{Error, Result};
