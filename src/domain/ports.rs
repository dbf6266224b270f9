use crate::domain::model::{Item, Report};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 一次拉取的結果: `Next` 對應 `{ value, done: false }`，`Done` 對應 `{ done: true }`
#[derive(Debug, Clone, PartialEq)]
pub enum Pull<T> {
    Next(T),
    Done,
}

impl<T> Pull<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Pull::Done)
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Pull::Next(value) => Some(value),
            Pull::Done => None,
        }
    }
}

/// Pull-based asynchronous producer of items.
///
/// Each call may suspend the caller. Once `Pull::Done` is returned every
/// later call must return `Pull::Done` as well.
#[async_trait]
pub trait ItemSource: Send {
    async fn pull(&mut self) -> Pull<Item>;
}

pub trait ReportSink: Send + Sync {
    fn admitted(&self, total: f64) -> Result<()>;
    fn settled(&self, report: &Report) -> Result<()>;
}
