pub mod apis;
pub mod common;
pub mod config;
pub mod logging;
pub mod pipeline;

// Domain data shapes shared across layers
pub mod domain;

pub use common::error::{PlanError, Result};
pub use common::types::{EventSink, RowSource, SubmitReceipt};
