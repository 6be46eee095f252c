//! Starlane Core -- shared types for the galaxy economy simulation.
//!
//! This crate holds everything the economy solver reads but does not own:
//! the star-system topology, the commodity catalog with its supply/demand
//! sources, a deterministic RNG and credit formatting helpers.
//!
//! # Key Types
//!
//! - [`universe::Universe`] -- Star systems, planets, jump routes and faction
//!   relations, keyed by generational [`id::SystemId`] / [`id::PlanetId`].
//! - [`commodity::Catalog`] -- Immutable commodity definitions (frozen at
//!   load), each optionally carrying a [`commodity::SupplyDemandSource`].
//! - [`credits::format_credits`] -- Human readable credit amounts.
//! - [`rng::SimRng`] -- SplitMix64 generator used by jittered sources.

pub mod commodity;
pub mod credits;
pub mod id;
pub mod rng;
pub mod universe;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
