// crates/trip-planner-config/src/lib.rs
// ============================================================================
// Module: Trip Planner Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for trip-planner.toml semantics.
// Dependencies: trip-planner-core, trip-planner-routing, serde, toml
// ============================================================================

//! ## Overview
//! `trip-planner-config` defines the configuration model shared by the server
//! and CLI. Loading is strict and fail-closed: unknown keys, oversized files,
//! and out-of-range limits are rejected before anything starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
