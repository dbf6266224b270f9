use crate::domain::model::Item;
use crate::domain::ports::{ItemSource, Pull};
use futures::stream::{FusedStream, Stream};
use std::pin::Pin;
use std::task::{Context, Poll};

/// 以固定順序逐一產出商品的拉取式來源
///
/// The item order is fixed at construction. A source cannot be restarted;
/// build a new one to iterate again.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    items: Vec<Item>,
    index: usize,
}

impl SequenceSource {
    pub fn create(items: Vec<Item>) -> Self {
        Self { items, index: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.items.len() - self.index
    }

    // `Next` for the last real element, `Done` only on the pull after it.
    fn advance(&mut self) -> Pull<Item> {
        match self.items.get(self.index) {
            Some(item) => {
                self.index += 1;
                Pull::Next(item.clone())
            }
            None => Pull::Done,
        }
    }
}

#[async_trait::async_trait]
impl ItemSource for SequenceSource {
    async fn pull(&mut self) -> Pull<Item> {
        // 即使資料已在記憶體中，每次拉取仍讓出一次執行權
        tokio::task::yield_now().await;
        let pulled = self.advance();
        tracing::trace!(remaining = self.remaining(), done = pulled.is_done(), "pulled item");
        pulled
    }
}

impl Stream for SequenceSource {
    type Item = Item;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().advance().into_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl FusedStream for SequenceSource {
    fn is_terminated(&self) -> bool {
        self.remaining() == 0
    }
}
