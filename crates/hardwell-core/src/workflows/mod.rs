//! # Workflows Module
//!
//! High-level entry points that run a complete simulation from a validated
//! [`SimulationConfig`](crate::engine::config::SimulationConfig).
//!
//! - **Simulation Workflow** ([`simulate`]) - Builds the system, integrates it
//!   for the configured number of steps and returns a [`simulate::SimulationReport`].

pub mod simulate;
