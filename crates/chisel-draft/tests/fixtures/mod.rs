//! Shared fixtures for the integration tests.
//!
//! The models here are hand-written record drafts covering:
//! - Plain fields through `ValueField`
//! - An `Arc`-backed field with a custom rebuild seam, so identity reuse
//!   across freezes is observable
//! - Container fields over draftable and plain element types

#![allow(dead_code)]

pub mod models;
