//! Name Guesser Library
//!
//! Predicts age, gender and likely country for a name by querying the
//! Agify, Genderize and Nationalize services, and serves a small browser
//! form on top of it.
//!
//! # Modules
//!
//! - `api`: API definitions and the OpenAPI document.
//! - `core`: Core guess logic.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `guesser`: Guess workflow (orchestration of the three lookups).
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Upstream response shapes and API models.
//! - `regions`: Region code to English name resolution.
//! - `services`: Agify, Genderize and Nationalize clients.
//! - `session`: Per-form guess sessions.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod errors;
pub mod guesser;
pub mod handlers;
pub mod models;
pub mod regions;
pub mod services;
pub mod session;
