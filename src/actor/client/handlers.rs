use tokio::time::Instant;

use super::{ClientActor, Phase, SessionEnd};
use crate::logger::{status_error, status_idle, status_success, status_warning};
use crate::reload::Notification;
use crate::reload::snapshot;

impl ClientActor {
    // =========================================================================
    // Control
    // =========================================================================

    /// Connect, but only on a development host.
    pub(super) fn on_start(&mut self) {
        let location = self.page.location();
        if !location.is_allowed(&self.settings.allow_hosts) {
            crate::debug!("client"; "`{}` is not a development host, staying inactive", location.hostname());
            return;
        }
        if self.current_phase() != Phase::Idle {
            crate::debug!("client"; "already started ({})", self.current_phase());
            return;
        }
        self.connect();
    }

    /// Connect regardless of host, phase or remaining attempts.
    pub(super) fn on_manual_reconnect(&mut self) {
        crate::log!("connect"; "reconnecting");
        self.connect();
    }

    pub(super) fn on_disconnect(&mut self) {
        self.reconnect_at = None;
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        self.set_phase(Phase::Idle);
        status_idle("disconnected");
    }

    /// Open a new connection, replacing (and closing) the current one.
    fn connect(&mut self) {
        self.reconnect_at = None;
        if let Some(old) = self.connection.take() {
            old.close();
        }

        self.generation += 1;
        let url = self.page.location().socket_url(&self.settings.ws_path);
        crate::debug!("connect"; "opening {} (#{})", url, self.generation);

        let connection = self
            .transport
            .open(&url, self.generation, self.events_tx.clone());
        self.connection = Some(connection);
        self.set_phase(Phase::Connecting);
    }

    // =========================================================================
    // Socket events
    // =========================================================================

    pub(super) fn on_open(&mut self) {
        self.backoff.reset();
        self.set_phase(Phase::Open);
        status_success(&format!(
            "connected to {}",
            self.page.location().socket_url(&self.settings.ws_path)
        ));
    }

    pub(super) fn on_message(&mut self, payload: &str) {
        match Notification::parse(payload) {
            Notification::Reload { reason } => self.on_reload(reason.as_deref()),
            Notification::Ignored => {}
        }
    }

    /// Socket errors are reported only; the close that follows drives recovery.
    pub(super) fn on_error(&mut self, error: &str) {
        crate::log!("error"; "socket error: {}", error);
    }

    pub(super) fn on_close(&mut self) {
        self.connection = None;

        match self.backoff.next_delay() {
            Some(delay) => {
                self.reconnect_at = Some(Instant::now() + delay);
                self.set_phase(Phase::ClosedBackoff);
                status_warning(&format!(
                    "disconnected, retrying in {}ms ({}/{})",
                    delay.as_millis(),
                    self.backoff.attempts(),
                    self.backoff.max_attempts()
                ));
            }
            None => {
                self.set_phase(Phase::ClosedExhausted);
                status_error(
                    "disconnected",
                    &format!(
                        "gave up after {} attempts, reconnect manually",
                        self.backoff.max_attempts()
                    ),
                );
            }
        }
    }

    // =========================================================================
    // Timers
    // =========================================================================

    pub(super) fn on_reconnect_due(&mut self) {
        crate::debug!(
            "connect";
            "attempt {}/{}",
            self.backoff.attempts(),
            self.backoff.max_attempts()
        );
        self.connect();
    }

    /// Snapshot state now, reload after the settle delay.
    fn on_reload(&mut self, reason: Option<&str>) {
        crate::log!("reload"; "{}", reason.unwrap_or("requested by server"));

        // A failed write only loses the state, the page still reloads
        if let Err(e) = snapshot::persist(&self.page, &self.settings.storage_key) {
            crate::log!("warning"; "failed to save state: {}", e);
        }

        if self.reload_at.is_some() {
            crate::debug!("reload"; "reload already pending");
            return;
        }
        self.reload_at = Some(Instant::now() + self.settings.reload_delay);
    }

    pub(super) fn on_reload_due(&mut self) -> Option<SessionEnd> {
        match self.page.reloader().reload() {
            Ok(()) => Some(SessionEnd::Reloaded),
            Err(e) => {
                crate::log!("error"; "reload failed: {}", e);
                None
            }
        }
    }

    /// Release the connection and timers when the session ends.
    pub(super) fn teardown(&mut self) {
        self.reconnect_at = None;
        self.reload_at = None;
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        self.set_phase(Phase::Idle);
    }
}
