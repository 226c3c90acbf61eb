//! # Core Module
//!
//! This module provides the stateless building blocks of HardWell's
//! event-driven hard-core collision kernel.
//!
//! ## Overview
//!
//! Everything in `core` is either plain data or a pure function of that data,
//! with one deliberate exception: the reactive square well owns a
//! [`bonding::BondLedger`] that its collisions mutate. Scheduling, time
//! keeping and observables live one layer up in [`crate::engine`].
//!
//! ## Architecture
//!
//! - **Particle Representation** ([`models`]) - Particles, species and the particle store
//! - **Boundary Conditions** ([`boundary`]) - Open space and periodic boxes
//! - **Pair Kinematics** ([`kinematics`]) - Relative state and collision roots
//! - **Pair Potentials** ([`potentials`]) - Collision-time prediction and resolution
//! - **Bond Bookkeeping** ([`bonding`]) - Symmetric, valence-limited bond ledger
//! - **Error Handling** ([`error`]) - Fatal kernel invariant violations
//!
//! ## Scientific Foundation
//!
//! Between collisions particles move on straight lines, so the time to the
//! next discontinuity of a step potential is the root of a quadratic in time.
//! Collisions exchange momentum along the line of centers with an impulse
//! chosen so that the change in kinetic energy exactly balances the step in
//! potential energy.

pub mod bonding;
pub mod boundary;
pub mod error;
pub mod kinematics;
pub mod models;
pub mod potentials;
