//! Shared building blocks for the Reliquary contract suite.
//!
//! This crate provides:
//! - [`roles`]: non-hierarchical role assignments (`Admin`, `Operator`,
//!   `EmissionCurve`) with per-role member tracking.
//! - [`reentrancy`]: a scoped lock that rejects nested entry into a
//!   contract's mutating functions.
//!
//! Helpers report failure through `bool` / `Option` so every contract can map
//! them onto its own error enum.

#![no_std]

pub mod reentrancy;
pub mod roles;

pub use reentrancy::ReentrancyGuard;
pub use roles::Role;
