#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod assembler;
pub mod config;
pub mod export_data;
pub mod geojson;
pub mod import_data;
pub mod journey;
pub mod journey_extractor;
pub mod location_history;
pub mod logs;
pub mod mapbox;
pub mod ping_correlator;
pub mod pipeline;
pub mod utils;
