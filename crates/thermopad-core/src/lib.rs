//! Thermopad Core - Domain logic and business rules
//!
//! This crate contains the shared core used by the API client, the refresh
//! coordinator, and the CLI:
//! - **Domain entities** - `DeviceStatus`, `ClaimedDevice`, `DeviceKind`
//! - **Port definitions** - The `DeviceApi` trait implemented by the HTTP adapter
//! - **Configuration** - Typed YAML configuration with defaults and validation
//!
//! # Architecture
//!
//! The domain module contains pure logic with no I/O. Ports define trait
//! interfaces that adapter crates implement; consumers (e.g. the refresh
//! coordinator) depend only on the port, which keeps them testable without
//! a live API.

pub mod config;
pub mod domain;
pub mod ports;
