//! Guerbet - kinetics demo for ethanol upgrading to butanol and hexanol
//!
//! The numerical core lives in `guerbet_kinetics` and the session in
//! `guerbet_core`; this crate adds application configuration and the
//! systems that drive a session from the binary.

pub mod config;
pub mod systems;
