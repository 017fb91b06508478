//! Restoview Library
//!
//! This module exposes the data layer, the page controller and the views for
//! use by the binary and in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod refresh;
pub mod repository;
pub mod ui;
