pub mod basket;
pub mod checkout;
pub mod render;
pub mod signal;
pub mod source;

pub use crate::domain::model::{Item, Report};
pub use crate::domain::ports::{ItemSource, Pull, ReportSink};
pub use crate::utils::error::Result;
