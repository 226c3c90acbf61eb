//! # HardWell Core Library
//!
//! An event-driven molecular dynamics kernel for hard-sphere, square-well and
//! reactive square-well particles, with exact collision-time prediction and
//! momentum-conserving collision resolution.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ParticleSystem`),
//!   boundaries, pair kinematics and the pair potentials that predict and
//!   resolve collisions, together with the bond ledger of the reactive well.
//!
//! - **[`engine`]: The Logic Core.** The stateful reference event scheduler
//!   (`HardIntegrator`) with its collision calendar, run configuration,
//!   observables and progress reporting.
//!
//! - **[`workflows`]: The Public API.** High-level entry points that turn a
//!   validated configuration into a finished run and a summary report.

pub mod core;
pub mod engine;
pub mod workflows;
