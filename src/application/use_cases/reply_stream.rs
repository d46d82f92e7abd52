use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::stream::{FusedStream, Stream};
use futures_util::{FutureExt, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::{render_failure, TextStream};
use crate::domain::DomainError;

/// Where a [`ReplyStream`] is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPhase {
    /// Created but never polled; no connection exists yet.
    Idle,
    Streaming,
    Completed,
    /// Yielded its single error chunk.
    Errored,
    Cancelled,
}

impl ReplyPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReplyPhase::Completed | ReplyPhase::Errored | ReplyPhase::Cancelled
        )
    }
}

/// A lazily opened, single-use stream of reply text.
///
/// Nothing touches the network until the first poll. Deltas are yielded in
/// arrival order; a failure at any point becomes one final chunk holding the
/// rendered error, after which the stream ends. Cancelling (directly or through
/// [`ReplyStream::cancel_token`]) drops the transport and ends the stream.
pub struct ReplyStream {
    phase: ReplyPhase,
    connect: Option<BoxFuture<'static, Result<TextStream, DomainError>>>,
    deltas: Option<TextStream>,
    cancel: CancellationToken,
    cancelled: Pin<Box<dyn Future<Output = ()> + Send>>,
}

impl ReplyStream {
    pub fn new<F>(connect: F) -> Self
    where
        F: Future<Output = Result<TextStream, DomainError>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let cancelled = Box::pin(cancel.clone().cancelled_owned());
        Self {
            phase: ReplyPhase::Idle,
            connect: Some(connect.boxed()),
            deltas: None,
            cancel,
            cancelled,
        }
    }

    pub fn phase(&self) -> ReplyPhase {
        self.phase
    }

    /// A handle another task can use to stop this stream.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops the stream and releases the connection. Idempotent.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if !self.phase.is_terminal() {
            self.finish(ReplyPhase::Cancelled);
        }
    }

    fn finish(&mut self, phase: ReplyPhase) {
        debug!("Reply stream finished: {:?}", phase);
        self.phase = phase;
        self.connect = None;
        self.deltas = None;
    }

    fn fail(&mut self, err: DomainError) -> String {
        warn!("Reply stream failed: {}", err);
        self.finish(ReplyPhase::Errored);
        render_failure(&err)
    }
}

impl Stream for ReplyStream {
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        let this = self.get_mut();

        if this.phase.is_terminal() {
            return Poll::Ready(None);
        }
        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.finish(ReplyPhase::Cancelled);
            return Poll::Ready(None);
        }
        if this.phase == ReplyPhase::Idle {
            this.phase = ReplyPhase::Streaming;
        }

        if let Some(connect) = this.connect.as_mut() {
            match connect.poll_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(deltas)) => {
                    this.connect = None;
                    this.deltas = Some(deltas);
                }
                Poll::Ready(Err(err)) => return Poll::Ready(Some(this.fail(err))),
            }
        }

        loop {
            let Some(deltas) = this.deltas.as_mut() else {
                this.finish(ReplyPhase::Completed);
                return Poll::Ready(None);
            };
            match deltas.poll_next_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(text))) if text.is_empty() => continue,
                Poll::Ready(Some(Ok(text))) => return Poll::Ready(Some(text)),
                Poll::Ready(Some(Err(err))) => return Poll::Ready(Some(this.fail(err))),
                Poll::Ready(None) => {
                    this.finish(ReplyPhase::Completed);
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl FusedStream for ReplyStream {
    fn is_terminated(&self) -> bool {
        self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use futures_util::stream;

    use super::*;

    fn deltas(items: Vec<Result<&'static str, DomainError>>) -> TextStream {
        stream::iter(items.into_iter().map(|r| r.map(str::to_string))).boxed()
    }

    #[tokio::test]
    async fn yields_deltas_in_order_then_completes() {
        let mut reply = ReplyStream::new(async {
            Ok::<_, DomainError>(deltas(vec![Ok("Hello"), Ok(" there"), Ok("!")]))
        });
        assert_eq!(reply.phase(), ReplyPhase::Idle);

        let mut chunks = Vec::new();
        while let Some(chunk) = reply.next().await {
            chunks.push(chunk);
        }

        assert_eq!(chunks, vec!["Hello", " there", "!"]);
        assert_eq!(reply.phase(), ReplyPhase::Completed);
        assert!(reply.is_terminated());
    }

    #[tokio::test]
    async fn connection_is_opened_lazily() {
        let opened = Arc::new(AtomicBool::new(false));
        let flag = opened.clone();
        let mut reply = ReplyStream::new(async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, DomainError>(deltas(vec![Ok("x")]))
        });

        assert!(!opened.load(Ordering::SeqCst));
        assert_eq!(reply.next().await.as_deref(), Some("x"));
        assert!(opened.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn connect_failure_yields_single_error_chunk() {
        let reply = ReplyStream::new(async {
            Err::<TextStream, _>(DomainError::provider("401 Unauthorized"))
        });
        let chunks: Vec<String> = reply.collect().await;

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("API Error: 401 Unauthorized"));
    }

    #[tokio::test]
    async fn mid_stream_failure_terminates_after_error_chunk() {
        let mut reply = ReplyStream::new(async {
            Ok::<_, DomainError>(deltas(vec![
                Ok("partial"),
                Err(DomainError::transport("connection reset")),
                Ok("never seen"),
            ]))
        });

        assert_eq!(reply.next().await.as_deref(), Some("partial"));
        assert_eq!(reply.next().await.as_deref(), Some("Error: connection reset"));
        assert_eq!(reply.phase(), ReplyPhase::Errored);
        assert_eq!(reply.next().await, None);
    }

    #[tokio::test]
    async fn empty_deltas_are_skipped() {
        let reply = ReplyStream::new(async {
            Ok::<_, DomainError>(deltas(vec![Ok(""), Ok("a"), Ok(""), Ok("b")]))
        });
        let chunks: Vec<String> = reply.collect().await;
        assert_eq!(chunks, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn cancel_stops_a_stalled_stream() {
        let stalled: TextStream = stream::iter(vec![Ok("first".to_string())])
            .chain(stream::pending())
            .boxed();
        let mut reply = ReplyStream::new(async move { Ok::<_, DomainError>(stalled) });
        let token = reply.cancel_token();

        assert_eq!(reply.next().await.as_deref(), Some("first"));

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            token.cancel();
        });
        assert_eq!(reply.next().await, None);
        canceller.await.unwrap();

        assert_eq!(reply.phase(), ReplyPhase::Cancelled);
        assert_eq!(reply.next().await, None);
    }

    #[tokio::test]
    async fn cancel_before_first_poll_never_connects() {
        let opened = Arc::new(AtomicBool::new(false));
        let flag = opened.clone();
        let mut reply = ReplyStream::new(async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, DomainError>(deltas(vec![Ok("x")]))
        });

        reply.cancel();

        assert_eq!(reply.next().await, None);
        assert!(!opened.load(Ordering::SeqCst));
        assert_eq!(reply.phase(), ReplyPhase::Cancelled);
    }
}
