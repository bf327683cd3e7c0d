// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use thiserror::Error;

/// Convenience type alias for boxed errors from configuration sources.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid snowflake configuration: {0}")]
    InvalidConfiguration(String),
    #[error("could not find snowflake by name '{0}'")]
    NotFound(String),
    #[error("clock moved backwards, refusing to generate id for {0} milliseconds")]
    ClockMovedBackward(i64),
    #[error("snowflake '{0}' is already registered")]
    RegistrationConflict(String),
    #[error("over the time limit")]
    OverTimeLimit,
    #[error("mutex is poisoned (i.e. a panic happened while it was locked)")]
    MutexPoisoned,
    #[error("start_time `{0}` is ahead of current time")]
    StartTimeAheadOfCurrentTime(DateTime<Utc>),
    #[error("could not load snowflake configuration: {0}")]
    ConfigurationSource(#[source] BoxDynError),
}
