//! `versenav` - Bible corpus navigator.
//!
//! Indexes a reference-keyed verse dataset and provides reference lookup,
//! canonical next/previous traversal and scoped keyword search, with a
//! terminal reader and a scripting CLI on top.

pub mod app;
pub mod bible;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod services;
pub mod types;
pub mod ui;
