use crate::core::basket::{Admission, Basket};
use crate::core::source::SequenceSource;
use crate::domain::model::{Item, Report};
use crate::domain::ports::{ItemSource, Pull, ReportSink};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 驅動整個流程: 逐一拉取商品、放入購物籃、結算並等待報表
///
/// Every pull is awaited before the next `add`, so admissions happen in pull
/// order and never overlap.
pub struct CheckoutEngine<S: ItemSource> {
    source: S,
    basket: Basket,
    settle_delay: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutStats {
    pub pulled: usize,
    pub admitted: usize,
}

impl CheckoutStats {
    pub fn rejected(&self) -> usize {
        self.pulled - self.admitted
    }
}

impl<S: ItemSource> CheckoutEngine<S> {
    pub fn new(source: S, basket: Basket, settle_delay: Duration) -> Self {
        Self {
            source,
            basket,
            settle_delay,
        }
    }

    async fn fill(&mut self) -> CheckoutStats {
        let mut stats = CheckoutStats::default();

        while let Pull::Next(item) = self.source.pull().await {
            stats.pulled += 1;
            if self.basket.add(item) == Admission::Admitted {
                stats.admitted += 1;
            }
        }

        stats
    }

    pub async fn run(mut self) -> Result<Report> {
        let started = Instant::now();
        tracing::info!(limit = self.basket.limit(), "Starting checkout");

        let stats = self.fill().await;
        tracing::info!(
            pulled = stats.pulled,
            admitted = stats.admitted,
            rejected = stats.rejected(),
            "Source exhausted"
        );

        tracing::debug!("Waiting {:?} for settlement", self.settle_delay);
        let report = self.basket.settled(self.settle_delay).await?;

        tracing::info!(
            total = report.total(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Checkout completed"
        );
        Ok(report)
    }
}

/// Runs a checkout over `items`, reporting each admission and the final
/// report to `sink`.
pub async fn checkout<K>(
    items: Vec<Item>,
    limit: f64,
    settle_delay: Duration,
    sink: Arc<K>,
) -> Result<Report>
where
    K: ReportSink + 'static,
{
    let observer_sink = Arc::clone(&sink);
    let basket = Basket::with_observer(limit, move |_items, total| {
        if let Err(e) = observer_sink.admitted(total) {
            tracing::warn!("Failed to report admission: {}", e);
        }
    })?;

    let engine = CheckoutEngine::new(SequenceSource::create(items), basket, settle_delay);
    let report = engine.run().await?;
    sink.settled(&report)?;
    Ok(report)
}
