//! Host bridge
//!
//! The dialog talks to its host through a [`HostBridge`]: a cloneable handle
//! over an ordered queue of [`Envelope`]s. Requests carry a oneshot sender
//! for the reply; notifications do not. The other end is either a
//! [`HostEndpoint`] in the same process or a socket connection task (see
//! [`crate::ipc`]).

mod host;

pub use host::{dispatch, Dispatch, HostBackend, StaticHost};

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::{CapturerError, Result};
use crate::protocol::{AudioSettings, DialogMessage, HostReply, Outcome, SourceList};

/// One message on its way to the host
#[derive(Debug)]
pub struct Envelope {
    pub message: DialogMessage,
    /// Present for requests
    pub reply: Option<oneshot::Sender<HostReply>>,
}

/// Dialog-side handle to the host
#[derive(Debug, Clone)]
pub struct HostBridge {
    tx: mpsc::UnboundedSender<Envelope>,
    outcome_sent: Arc<AtomicBool>,
}

impl HostBridge {
    /// Create a bridge connected to an in-process endpoint
    pub fn pair() -> (HostBridge, HostEndpoint) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::from_sender(tx), HostEndpoint { rx })
    }

    /// Wrap an existing envelope queue
    pub fn from_sender(tx: mpsc::UnboundedSender<Envelope>) -> Self {
        Self {
            tx,
            outcome_sent: Arc::new(AtomicBool::new(false)),
        }
    }

    fn request(&self, message: DialogMessage) -> Result<oneshot::Receiver<HostReply>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        debug!("-> host request {:?}", message);
        self.tx
            .send(Envelope {
                message,
                reply: Some(reply_tx),
            })
            .map_err(|_| CapturerError::ChannelClosed)?;
        Ok(reply_rx)
    }

    fn notify(&self, message: DialogMessage) -> Result<()> {
        debug!("-> host notify {:?}", message);
        self.tx
            .send(Envelope {
                message,
                reply: None,
            })
            .map_err(|_| CapturerError::ChannelClosed)
    }

    /// Ask the host for the capturable sources
    ///
    /// `Ok(None)` means the host could not enumerate them.
    pub async fn request_sources(&self) -> Result<Option<SourceList>> {
        let reply = self.request(DialogMessage::GetSources)?;
        match reply.await.map_err(|_| CapturerError::ChannelClosed)? {
            HostReply::Sources { list } => Ok(list),
            HostReply::Error { message } => Err(CapturerError::ipc(message)),
            other => Err(CapturerError::protocol(format!(
                "Unexpected reply to getSources: {:?}",
                other
            ))),
        }
    }

    /// Ask the host for the persisted audio setting
    ///
    /// The request is sent immediately; the returned future resolves when the
    /// host answers.
    pub fn request_audio_settings(&self) -> Result<PendingReply<AudioSettings>> {
        let rx = self.request(DialogMessage::GetAudioSettings)?;
        Ok(PendingReply::new(rx, |reply| match reply {
            HostReply::AudioSettings(settings) => Ok(settings),
            HostReply::Error { message } => Err(CapturerError::ipc(message)),
            other => Err(CapturerError::protocol(format!(
                "Unexpected reply to getAudioSettings: {:?}",
                other
            ))),
        }))
    }

    /// Tell the host the master audio switch changed
    pub fn push_audio_setting_changed(&self, enabled: bool) -> Result<()> {
        self.notify(DialogMessage::SettingsChanged {
            screen_share_store: AudioSettings { audio: enabled },
        })
    }

    /// Send the terminal outcome
    ///
    /// Only the first call on any clone of this bridge goes through.
    pub fn emit_outcome(&self, outcome: Outcome) -> Result<()> {
        if self.outcome_sent.swap(true, Ordering::SeqCst) {
            warn!("Dropping second outcome {:?}", outcome);
            return Err(CapturerError::OutcomeAlreadySent);
        }
        match &outcome {
            Outcome::Accept(payload) => info!(
                "Closing dialog: picked {:?}, audio {}",
                payload.source_id(),
                payload.audio.is_on()
            ),
            Outcome::Reject(reason) => info!("Closing dialog: {}", reason),
        }
        self.notify(DialogMessage::CloseView { outcome })
    }

    /// Whether the outcome was already sent
    pub fn outcome_sent(&self) -> bool {
        self.outcome_sent.load(Ordering::SeqCst)
    }
}

/// Reply to a request that is still in flight
pub struct PendingReply<T> {
    rx: oneshot::Receiver<HostReply>,
    map: fn(HostReply) -> Result<T>,
}

impl<T> PendingReply<T> {
    fn new(rx: oneshot::Receiver<HostReply>, map: fn(HostReply) -> Result<T>) -> Self {
        Self { rx, map }
    }
}

impl<T> Future for PendingReply<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(reply)) => Poll::Ready((self.map)(reply)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(CapturerError::ChannelClosed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Host side of an in-process bridge
#[derive(Debug)]
pub struct HostEndpoint {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl HostEndpoint {
    /// Receive the next envelope
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }

    /// Answer requests from a backend until the dialog reports its outcome
    pub async fn serve<B: HostBackend>(mut self, backend: &mut B) -> Result<Outcome> {
        while let Some(envelope) = self.rx.recv().await {
            match dispatch(backend, envelope.message) {
                Dispatch::Reply(reply) => {
                    if let Some(tx) = envelope.reply {
                        // Dialog may already be gone; nothing to do then.
                        let _ = tx.send(reply);
                    }
                }
                Dispatch::Ack => {}
                Dispatch::Closed(outcome) => return Ok(outcome),
            }
        }
        Err(CapturerError::ChannelClosed)
    }
}
