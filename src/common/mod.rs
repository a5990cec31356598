//! Common, shared types: roles, collision layers, tunables and state.

pub mod layers;
pub mod roles;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
