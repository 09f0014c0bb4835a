//! Scorekeeper websocket client.
//!
//! One client runs per worker thread, on a current-thread tokio runtime owned
//! by that thread. The receive loop never blocks for longer than
//! [`StreamConfig::recv_timeout`], so a stop request is noticed within one
//! timeout. Updates that do not fit in the queue are dropped: the scene should
//! follow the latest match state, not replay a backlog.

use std::{io, time::Duration};

use futures_util::{SinkExt, StreamExt};
use matchcast_core::EnqueueError;
use matchcast_proto::MatchUpdate;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::{
    error::StreamError,
    worker::{Launcher, StopSignal, WorkerContext, WorkerHandle},
};

/// Default receive timeout, which bounds stop latency.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_millis(200);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Stream client tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Longest wait for a frame before re-checking the stop signal
    pub recv_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { recv_timeout: DEFAULT_RECV_TIMEOUT }
    }
}

/// Websocket client feeding the update queue.
#[derive(Debug)]
pub struct StreamClient {
    uri: String,
    config: StreamConfig,
    context: WorkerContext,
    /// Updates refused by a full queue
    dropped: u64,
}

impl StreamClient {
    /// Client for `uri`; nothing happens until [`StreamClient::run`].
    pub fn new(uri: impl Into<String>, config: StreamConfig, context: WorkerContext) -> Self {
        Self { uri: uri.into(), config, context, dropped: 0 }
    }

    /// Run to completion on a fresh current-thread runtime.
    ///
    /// This is the body of a worker thread.
    pub fn run_blocking(self, stop: &StopSignal) -> Result<(), StreamError> {
        block_on_detached(self.run(stop)).map_err(StreamError::Runtime)?
    }

    /// Connect, then forward updates until stopped or disconnected.
    ///
    /// Returns `Ok` only when `stop` was raised. Any connection failure or
    /// close by the peer is an error, which the supervisor treats as a reason
    /// to reconnect.
    pub async fn run(mut self, stop: &StopSignal) -> Result<(), StreamError> {
        let Some(mut socket) = self.connect(stop).await? else {
            debug!(uri = %self.uri, "stop requested while connecting");
            return Ok(());
        };
        self.context.reconnect.record_connected();
        info!(uri = %self.uri, "connected to scorekeeper stream");

        let result = self.receive(&mut socket, stop).await;
        if self.dropped > 0 {
            debug!(dropped = self.dropped, "updates dropped on a full queue");
        }
        if result.is_ok()
            && let Err(err) = socket.send(Message::Close(None)).await
        {
            debug!(%err, "close handshake failed");
        }
        result
    }

    /// Connect, checking `stop` at every receive timeout while the handshake
    /// is in flight. `None` means stopped before connecting.
    async fn connect(&self, stop: &StopSignal) -> Result<Option<Socket>, StreamError> {
        let connect = connect_async(self.uri.as_str());
        tokio::pin!(connect);
        let mut checks = tokio::time::interval(self.config.recv_timeout);

        loop {
            tokio::select! {
                result = &mut connect => {
                    let (socket, _response) = result?;
                    return Ok(Some(socket));
                },
                _ = checks.tick() => {
                    if stop.is_raised() {
                        return Ok(None);
                    }
                },
            }
        }
    }

    async fn receive(&mut self, socket: &mut Socket, stop: &StopSignal) -> Result<(), StreamError> {
        while !stop.is_raised() {
            let Ok(next) = tokio::time::timeout(self.config.recv_timeout, socket.next()).await
            else {
                continue;
            };

            match next {
                Some(Ok(Message::Text(text))) => self.forward(&text),
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "scorekeeper sent close");
                    return Err(StreamError::Closed);
                },
                // pings are answered by tungstenite; binary frames carry nothing for us
                Some(Ok(_)) => {},
                Some(Err(err)) => return Err(err.into()),
                None => return Err(StreamError::Closed),
            }
        }
        Ok(())
    }

    fn forward(&mut self, text: &str) {
        let update = match MatchUpdate::decode(text) {
            Ok(update) => update,
            Err(err) => {
                debug!(%err, "ignoring frame");
                return;
            },
        };

        match self.context.updates.try_enqueue(update) {
            Ok(()) => {},
            Err(EnqueueError::Full) => self.dropped += 1,
            Err(EnqueueError::Closed) => warn!("update queue closed; dropping update"),
        }
    }
}

/// Drive `future` on a fresh current-thread runtime.
///
/// The runtime is shut down without waiting for blocking-pool work, so an
/// abandoned DNS lookup cannot hold the worker thread past its stop.
fn block_on_detached<F: Future>(future: F) -> io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

/// Launches [`StreamClient`] workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamLauncher {
    config: StreamConfig,
}

impl StreamLauncher {
    /// Launcher with custom client tuning.
    pub fn new(config: StreamConfig) -> Self {
        Self { config }
    }
}

impl Launcher for StreamLauncher {
    fn launch(&self, uri: &str, context: WorkerContext) -> io::Result<WorkerHandle> {
        let client = StreamClient::new(uri, self.config, context);
        WorkerHandle::spawn("matchcast-stream", move |stop| client.run_blocking(&stop))
    }
}
