// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Search orchestration for one dashboard session.
//!
//! The orchestrator is a pure state machine: [`apply`] takes the current
//! [`Session`] and a [`Trigger`] and returns the next session together with
//! the [`Effect`]s (fetches, history writes) the caller must carry out.
//! Completed fetches come back in as [`Trigger::FetchCompleted`].

mod apply;
mod effect;
mod error;
mod state;
mod trigger;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use effect::{Effect, FetchOutcome, FetchRequest, RequestId};
pub use error::CoreError;
pub use state::{
    AccessState, InspectionState, NetworkAccess, Section, SectionError, Session, TransitionResult,
};
pub use trigger::Trigger;
