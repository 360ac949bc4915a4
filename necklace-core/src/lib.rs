//! # necklace-core
//!
//! Engine behind the necklace pattern views: Euclidean pattern generation,
//! ring geometry, transport phase, pulse animation and the per-processor
//! controller that ties them to a drawable scene. Independent of any UI
//! framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use necklace_core::config::Config;
//! use necklace_core::rack::Rack;
//! use necklace_core::scene::MemoryScene;
//! use necklace_core::store::Store;
//! use necklace_types::{Dispatcher, StoreAction};
//!
//! let config = Config::load();
//! let mut store = Store::default();
//! let mut rack = Rack::new(|_| MemoryScene::new());
//! rack.initialize(&mut store);
//!
//! store.dispatch(&StoreAction::CreateProcessor {
//!     params: config.pattern_defaults(),
//!     position: [0.0, 0.0, 0.0],
//! });
//!
//! // every frame
//! rack.process_notifications(&mut store);
//! rack.draw(position, &events_by_id, now_ms);
//! ```
//!
//! ## Module Overview
//!
//! - [`euclid`] — Bjorklund pattern generation and rotation
//! - [`geometry`] — marker placement, connecting polygon, pointer shapes
//! - [`clock`] — cycle duration and read-head phase
//! - [`pulse`] — onset-driven pulse animation with stale-ignition guards
//! - [`scene`] — rendering-layer trait and the in-memory `MemoryScene`
//! - [`controller`] — `PatternController`, one per processor
//! - [`rack`] — every controller of a project, fed from the store
//! - [`store`] — publish/subscribe store around the pure reducers
//! - [`project`] — JSON save/load
//! - [`config`] — TOML configuration (embedded + user override)

pub mod clock;
pub mod config;
pub mod controller;
pub mod euclid;
pub mod geometry;
pub mod project;
pub mod pulse;
pub mod rack;
pub mod scene;
pub mod store;
