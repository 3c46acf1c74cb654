//! # vox-telephony
//!
//! REST client for the telephony provider: call metadata lookup, recording
//! listing, and authenticated recording download.
//!
//! The [`TelephonyClient`] trait is the seam the runtime depends on;
//! [`HttpTelephonyClient`] is the production implementation speaking the
//! provider's `2010-04-01` REST dialect with basic auth.
//!
//! ## Crate Position
//!
//! Depends on: vox-core, vox-settings.
//! Depended on by: vox-runtime.

#![deny(unsafe_code)]

pub mod client;
pub mod errors;
pub mod types;

pub use client::{HttpTelephonyClient, TelephonyClient, TelephonyConfig};
pub use errors::{Result, TelephonyError};
