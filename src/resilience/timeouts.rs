//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap backend calls with a deadline
//! - Bound the gaps between body frames of a streamed backend response
//! - Keep timeouts distinct from other failures
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the wrapped future is dropped on
//!   expiry, which cancels the outbound call
//! - Timed-out requests return 504 Gateway Timeout
//! - A stalled response body cannot be turned into a 504 (the status line
//!   is already out), so the body fails and the client connection is cut

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;

use axum::BoxError;
use hyper::body::{Body as HttpBody, Bytes, Frame, SizeHint};
use thiserror::Error;
use tokio::time::{Instant, Sleep};

/// Failure of a deadline-bounded call.
#[derive(Debug)]
pub enum Deadline<E> {
    /// The deadline passed before the call finished.
    Elapsed(Duration),
    /// The call finished with its own error.
    Failed(E),
}

impl<E: std::fmt::Display> std::fmt::Display for Deadline<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deadline::Elapsed(limit) => write!(f, "deadline of {limit:?} exceeded"),
            Deadline::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// Run `call` with a deadline.
pub async fn with_deadline<F, T, E>(deadline: Duration, call: F) -> Result<T, Deadline<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(Deadline::Failed(e)),
        Err(_) => Err(Deadline::Elapsed(deadline)),
    }
}

/// Failure while streaming a deadline-bounded body.
#[derive(Debug, Error)]
pub enum BodyTimeoutError {
    #[error("no body data from upstream for {0:?}")]
    Idle(Duration),

    #[error("upstream body error: {0}")]
    Upstream(BoxError),
}

/// Response body that fails once `idle` passes without a new frame.
pub struct IdleTimeoutBody<B> {
    inner: B,
    idle: Duration,
    sleep: Pin<Box<Sleep>>,
}

impl<B> IdleTimeoutBody<B> {
    pub fn new(inner: B, idle: Duration) -> Self {
        Self {
            inner,
            idle,
            sleep: Box::pin(tokio::time::sleep(idle)),
        }
    }
}

impl<B> HttpBody for IdleTimeoutBody<B>
where
    B: HttpBody<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = BodyTimeoutError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
        let this = self.get_mut();

        if let Poll::Ready(frame) = Pin::new(&mut this.inner).poll_frame(cx) {
            this.sleep.as_mut().reset(Instant::now() + this.idle);
            return Poll::Ready(
                frame.map(|result| result.map_err(|e| BodyTimeoutError::Upstream(e.into()))),
            );
        }

        ready!(this.sleep.as_mut().poll(cx));
        tracing::warn!(idle = ?this.idle, "Upstream body stalled, aborting response");
        Poll::Ready(Some(Err(BodyTimeoutError::Idle(this.idle))))
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
