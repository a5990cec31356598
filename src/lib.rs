//! Gem Dozer: a top-down bulldozer that pushes gems onto a collector.
//!
//! The binary is a thin wrapper around [`game::run`]. Integration tests in
//! `tests/` build headless apps through [`game::configure_headless`].

pub mod common;
pub mod game;
pub mod plugins;
