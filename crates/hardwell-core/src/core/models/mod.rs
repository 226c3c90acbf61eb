//! # Core Models Module
//!
//! This module contains the data structures used to represent a particle
//! system for event-driven dynamics in HardWell.
//!
//! ## Overview
//!
//! The models are deliberately thin. A [`particle::Particle`] knows its
//! position, velocity, inverse mass and species; a [`species::Species`] knows
//! its mass and bonding valence; the [`system::ParticleSystem`] owns both in
//! slot-map arenas keyed by the typed ids in [`ids`]. Interaction parameters
//! are owned by the pair potentials, not by the models.
//!
//! ## Key Components
//!
//! - [`particle`] - Kinetic particle state
//! - [`species`] - Type-level mass and valence
//! - [`pair`] - Borrowed pair handles used by the collision kernel
//! - [`system`] - The particle store with disjoint pair access
//! - [`ids`] - Typed identifiers for particles and species
//!
//! ## Usage
//!
//! ```ignore
//! use hardwell::core::models::{species::Species, system::ParticleSystem};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut system = ParticleSystem::new();
//! let a = system.add_species(Species::new("A", 1.0, 1));
//! let p = system.add_particle(a, Point3::origin(), Vector3::x()).unwrap();
//! ```

pub mod ids;
pub mod pair;
pub mod particle;
pub mod species;
pub mod system;
