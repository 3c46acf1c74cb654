//! # vox-core
//!
//! Foundation types for the Vox run engine.
//!
//! This crate provides the shared vocabulary the other vox crates depend on:
//!
//! - **Branded IDs**: [`ids::UserId`], [`ids::AssistantId`], [`ids::CallId`]
//!   as newtypes, plus the derived [`ids::RunId`] and composite [`ids::RunKey`]
//! - **Transcript**: [`messages::ChatMessage`] with system/user/assistant roles
//! - **Cost model**: [`cost::CostRecord`] and [`cost::SynthesizerKind`]
//! - **Call metadata**: [`call::CallMetadata`], [`call::RecordingRef`]
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other vox crates.

#![deny(unsafe_code)]

pub mod call;
pub mod cost;
pub mod ids;
pub mod messages;
