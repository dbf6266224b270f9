pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::CheckoutSettings;
pub use crate::core::{
    basket::{Admission, Basket},
    checkout::{checkout, CheckoutEngine},
    render::{OutputFormat, StdoutSink},
    signal::{CompletionSignal, Subscription},
    source::SequenceSource,
};
pub use crate::domain::model::{Item, Report};
pub use crate::utils::error::{BasketError, Result};
