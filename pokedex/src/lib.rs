//! Pokedex TUI: a catalog list with search, filters and caught tracking,
//! and a detail page with linear navigation, backed by PokeAPI.

pub mod action;
pub mod api;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod effect;
pub mod error;
pub mod logging;
pub mod navigator;
pub mod reducer;
pub mod state;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod view;
