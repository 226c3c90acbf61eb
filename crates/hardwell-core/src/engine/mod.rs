//! # Engine Module
//!
//! This module drives the collision kernel forward in time. It turns a
//! validated configuration into a particle system with a table of pair
//! potentials, predicts every pending collision, and resolves them in time
//! order while accumulating the observables of the run.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Species, interactions, particles, boundary and step size
//! - **Potential Lookup** ([`potential_table`]) - Maps species pairs to the potential acting between them
//! - **Scheduling** ([`event`], [`calendar`]) - Predicted collisions ordered by time and invalidated by collision counts
//! - **Integration** ([`integrator`]) - The reference event-driven loop
//! - **Statistics** ([`observables`]) - Collision counts, virial sums and bond turnover
//! - **Progress Monitoring** ([`progress`]) - Callbacks for long runs
//! - **Error Handling** ([`error`]) - Configuration errors and fatal kernel violations with particle snapshots

pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod integrator;
pub mod observables;
pub mod potential_table;
pub mod progress;
