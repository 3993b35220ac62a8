//! Reload Client Actor
//!
//! Keeps a connection to the dev server open and reloads the page when told:
//! - Start only on development hosts, reconnect with exponential backoff
//! - On a reload notification, snapshot state, wait briefly, reload
//! - The session ends once the page has been reloaded

mod dispatch;
mod handlers;


use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::handle::ClientHandle;
use super::messages::{ClientMsg, SocketMsg};
use super::transport::{Connection, Transport, WsTransport};
use crate::core::{DEFAULT_ALLOW_HOSTS, DEFAULT_WS_PATH};
use crate::host::{HostError, HostPage};
use crate::reload::backoff::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
use crate::reload::snapshot::{self, DEFAULT_RELOAD_DELAY, DEFAULT_STORAGE_KEY};
use crate::reload::{Backoff, RestoreOutcome};

const CHANNEL_BUFFER: usize = 32;

/// Client tunables, usually built from `relive.toml`.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub allow_hosts: Vec<String>,
    pub ws_path: String,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub reload_delay: Duration,
    pub storage_key: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            allow_hosts: DEFAULT_ALLOW_HOSTS.iter().map(|h| h.to_string()).collect(),
            ws_path: DEFAULT_WS_PATH.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            reload_delay: DEFAULT_RELOAD_DELAY,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Connection lifecycle, as seen by handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started, disconnected, or on a non-development host
    Idle,
    Connecting,
    Open,
    /// Closed, a reconnect is scheduled
    ClosedBackoff,
    /// Closed, attempt budget spent; only a manual reconnect leaves this
    ClosedExhausted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::ClosedBackoff => "closed (retrying)",
            Self::ClosedExhausted => "closed (gave up)",
        })
    }
}

/// Why a client session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The page was reloaded; a fresh client belongs to the next load
    Reloaded,
    /// Shut down through a handle, or every handle was dropped
    Shutdown,
}

// =============================================================================
// ReloadClient
// =============================================================================

/// Entry point: one client per page load.
///
/// ```ignore
/// let client = ReloadClient::new(page, ClientSettings::default());
/// client.restore_on_load()?;
/// let (handle, session) = client.spawn();
/// handle.start().await;
/// assert_eq!(session.await?, SessionEnd::Reloaded);
/// ```
pub struct ReloadClient {
    page: HostPage,
    settings: ClientSettings,
    transport: Arc<dyn Transport>,
}

impl ReloadClient {
    pub fn new(page: HostPage, settings: ClientSettings) -> Self {
        Self {
            page,
            settings,
            transport: Arc::new(WsTransport),
        }
    }

    /// Replace the WebSocket transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn page(&self) -> &HostPage {
        &self.page
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Apply the snapshot left by the previous page, if any.
    pub fn restore_on_load(&self) -> Result<RestoreOutcome, HostError> {
        snapshot::restore_on_load(&self.page, &self.settings.storage_key)
    }

    /// Spawn the actor on the current tokio runtime.
    ///
    /// The actor stays idle until `ClientHandle::start` or `reconnect`.
    pub fn spawn(self) -> (ClientHandle, JoinHandle<SessionEnd>) {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);
        let (phase_tx, phase_rx) = watch::channel(Phase::Idle);
        let actor = ClientActor::new(self, rx, phase_tx);
        let task = tokio::spawn(actor.run());
        (ClientHandle::new(tx, phase_rx), task)
    }
}

impl fmt::Debug for ReloadClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadClient")
            .field("page", &self.page)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ClientActor
// =============================================================================

pub(crate) struct ClientActor {
    pub(super) rx: mpsc::Receiver<ClientMsg>,
    pub(super) events_tx: mpsc::UnboundedSender<SocketMsg>,
    pub(super) events_rx: mpsc::UnboundedReceiver<SocketMsg>,
    pub(super) phase: watch::Sender<Phase>,
    pub(super) page: HostPage,
    pub(super) settings: ClientSettings,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) backoff: Backoff,
    /// Bumped for every connection; events tagged otherwise are stale
    pub(super) generation: u64,
    pub(super) connection: Option<Connection>,
    pub(super) reconnect_at: Option<Instant>,
    pub(super) reload_at: Option<Instant>,
}

impl ClientActor {
    fn new(client: ReloadClient, rx: mpsc::Receiver<ClientMsg>, phase: watch::Sender<Phase>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let backoff = Backoff::new(client.settings.max_attempts, client.settings.base_delay);
        Self {
            rx,
            events_tx,
            events_rx,
            phase,
            page: client.page,
            settings: client.settings,
            transport: client.transport,
            backoff,
            generation: 0,
            connection: None,
            reconnect_at: None,
            reload_at: None,
        }
    }

    pub(super) fn set_phase(&self, phase: Phase) {
        self.phase.send_replace(phase);
    }

    pub(super) fn current_phase(&self) -> Phase {
        *self.phase.borrow()
    }
}
