use crate::core::signal::{CompletionSignal, Subscription};
use crate::domain::model::{Item, Report};
use crate::utils::error::{BasketError, Result};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// 每次成功收入商品後呼叫，參數為目前已收入的商品與新的合計
pub type AdmitObserver = Box<dyn FnMut(&[Item], f64) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected,
}

#[derive(Debug, Default)]
struct BasketState {
    items: Vec<Item>,
    total: f64,
}

/// 有上限的購物籃
///
/// An item is admitted only if the running total stays within `limit`;
/// anything else is dropped without an error. `settle` builds the final
/// report on a Tokio task once the delay elapses, so it must be called from
/// inside a Tokio runtime.
///
/// `settle` is meant to be called once. Later calls hand back the same
/// signal and do not schedule a second settlement.
///
/// The signal exists from construction, so a caller can register on it
/// (see `signal`) before the settlement task is spawned. `settled` does
/// exactly that and is the safe way to await the report on any runtime.
pub struct Basket {
    limit: f64,
    state: Arc<Mutex<BasketState>>,
    observer: Option<AdmitObserver>,
    signal: CompletionSignal<Report>,
    settle_requested: bool,
    settlement_task: Option<JoinHandle<()>>,
}

impl Basket {
    pub fn new(limit: f64) -> Result<Self> {
        if !limit.is_finite() || limit < 0.0 {
            return Err(BasketError::InvalidLimit { limit });
        }
        Ok(Self {
            limit,
            state: Arc::new(Mutex::new(BasketState::default())),
            observer: None,
            signal: CompletionSignal::new(),
            settle_requested: false,
            settlement_task: None,
        })
    }

    pub fn with_observer<F>(limit: f64, observer: F) -> Result<Self>
    where
        F: FnMut(&[Item], f64) + Send + 'static,
    {
        let mut basket = Self::new(limit)?;
        basket.observer = Some(Box::new(observer));
        Ok(basket)
    }

    fn lock(&self) -> MutexGuard<'_, BasketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&mut self, item: Item) -> Admission {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.total + item.price() > self.limit {
            tracing::trace!(
                item = item.name(),
                price = item.price(),
                total = state.total,
                limit = self.limit,
                "item rejected"
            );
            return Admission::Rejected;
        }

        state.total += item.price();
        state.items.push(item);
        tracing::debug!(total = state.total, admitted = state.items.len(), "item admitted");

        if let Some(observer) = self.observer.as_mut() {
            observer(&state.items, state.total);
        }

        Admission::Admitted
    }

    /// The signal `settle` resolves. Register on it before calling `settle`.
    pub fn signal(&self) -> CompletionSignal<Report> {
        self.signal.clone()
    }

    pub fn settle(&mut self, delay: Duration) -> CompletionSignal<Report> {
        if self.settle_requested {
            tracing::debug!("settlement already requested, returning existing signal");
            return self.signal.clone();
        }
        self.settle_requested = true;

        let state = Arc::clone(&self.state);
        let limit = self.limit;
        let resolver = self.signal.clone();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "settlement scheduled");

        self.settlement_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let report = {
                let state = state.lock().unwrap_or_else(PoisonError::into_inner);
                Report::new(state.items.clone(), state.total, limit)
            };
            tracing::info!(
                items = report.items().len(),
                total = report.total(),
                "basket settled"
            );
            resolver.resolve(report);
        }));

        self.signal.clone()
    }

    /// 先註冊回呼再排程結算，等待最終報表
    pub async fn settled(&mut self, delay: Duration) -> Result<Report> {
        let subscription = self.signal.subscribe();
        self.settle(delay);
        join_settlement(subscription, self.settlement_task.take()).await
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn total(&self) -> f64 {
        self.lock().total
    }

    pub fn remaining_capacity(&self) -> f64 {
        self.limit - self.total()
    }

    pub fn admitted(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_settling(&self) -> bool {
        self.settle_requested
    }
}

// A panicked or aborted task never resolves the signal, so its join error
// is reported instead of waiting forever.
async fn join_settlement(
    mut subscription: Subscription<Report>,
    task: Option<JoinHandle<()>>,
) -> Result<Report> {
    let Some(mut task) = task else {
        return subscription.await;
    };

    tokio::select! {
        biased;
        report = &mut subscription => report,
        joined = &mut task => match joined {
            Ok(()) => subscription.await,
            Err(e) => {
                tracing::error!("Settlement task failed: {}", e);
                Err(BasketError::SettlementTask {
                    message: e.to_string(),
                })
            }
        },
    }
}

impl fmt::Debug for Basket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Basket")
            .field("limit", &self.limit)
            .field("total", &state.total)
            .field("items", &state.items)
            .field("settling", &self.settle_requested)
            .finish()
    }
}
