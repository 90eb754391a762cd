//! dwcgen pipeline internals
//!
//! The binary lives in `main.rs`; everything here is a library so the
//! integration tests can drive the pipeline with fake resolvers and
//! scripted prompt sessions.

pub mod ledger;
pub mod pipeline;
pub mod report;
pub mod review;
pub mod session;
