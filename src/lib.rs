//! Library crate for directory-console.
//!
//! This crate exposes the building blocks of the console:
//! - Typed client and wire model for the directory API (`api`)
//! - Shell state, request dispatch and the event loop (`app`)
//! - Settings file (`config`)
//! - Error types (`error`)
//! - The five screens as pure state machines (`screens`)
//! - In-memory account filtering (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `directory-console` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod screens;
pub mod search;
pub mod ui;

/// Error types shared across the crate.
pub use error::{ApiError, ValidationError};
