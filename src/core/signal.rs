use crate::utils::error::{BasketError, Result};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::oneshot;

type Reaction<T> = Box<dyn FnOnce(T) + Send>;

enum SignalState<T> {
    Unresolved { reaction: Option<Reaction<T>> },
    Resolved,
}

/// 一次性的完成訊號，外部呼叫 `resolve` 送出結果
///
/// Holds a single reaction slot: registering again replaces the previous
/// reaction. The signal moves from unresolved to resolved exactly once and
/// does not buffer the value, so resolving before any reaction is registered
/// loses the value. There is no rejection path and no cancellation.
///
/// Clones share the same state.
pub struct CompletionSignal<T> {
    state: Arc<Mutex<SignalState<T>>>,
}

impl<T> CompletionSignal<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SignalState::Unresolved { reaction: None })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SignalState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.lock(), SignalState::Resolved)
    }

    /// Whether both handles refer to the same signal.
    pub fn same_signal(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    pub fn register_reaction<F>(&self, on_ready: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        let mut state = self.lock();
        match &mut *state {
            SignalState::Unresolved { reaction } => {
                if reaction.is_some() {
                    tracing::debug!("replacing previously registered reaction");
                }
                *reaction = Some(Box::new(on_ready));
            }
            SignalState::Resolved => {
                tracing::debug!("signal already resolved, reaction will never fire");
            }
        }
    }

    pub fn resolve(&self, value: T) {
        let reaction = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, SignalState::Resolved) {
                SignalState::Unresolved { reaction } => reaction,
                SignalState::Resolved => {
                    tracing::trace!("signal already resolved, ignoring value");
                    return;
                }
            }
        };

        // 在鎖外呼叫，讓回呼可以再次存取這個訊號
        match reaction {
            Some(on_ready) => on_ready(value),
            None => tracing::debug!("signal resolved without a reaction, value dropped"),
        }
    }

    /// Registers a reaction right away and returns a future for its value.
    ///
    /// The reaction is in place when this returns, so a resolution that
    /// happens afterwards is never lost, even on another thread.
    pub fn subscribe(&self) -> Subscription<T>
    where
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.register_reaction(move |value| {
            let _ = tx.send(value);
        });
        Subscription { rx }
    }

    /// Waits for the value by registering a reaction.
    ///
    /// Returns `BasketError::ResolutionLost` when the reaction can never fire:
    /// the signal was already resolved, or another registration replaced it.
    pub async fn wait(&self) -> Result<T>
    where
        T: Send + 'static,
    {
        self.subscribe().await
    }
}

/// 已註冊的回呼所對應的 future，由 `CompletionSignal::subscribe` 建立
#[derive(Debug)]
pub struct Subscription<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for Subscription<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.map_err(|_| BasketError::ResolutionLost))
    }
}

impl<T> Clone for CompletionSignal<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for CompletionSignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CompletionSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
