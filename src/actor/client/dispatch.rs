use tokio::time::Instant;

use super::{ClientActor, SessionEnd};
use crate::actor::messages::{ClientMsg, SocketEvent, SocketMsg};

impl ClientActor {
    /// Main event loop: control messages first, then socket events, then timers.
    pub async fn run(mut self) -> SessionEnd {
        loop {
            let end = tokio::select! {
                biased;

                msg = self.rx.recv() => match msg {
                    Some(msg) => self.dispatch(msg),
                    None => Some(SessionEnd::Shutdown),
                },

                Some(SocketMsg { generation, event }) = self.events_rx.recv() => {
                    self.on_socket(generation, event);
                    None
                }

                () = wait_until(self.reload_at) => {
                    self.reload_at = None;
                    self.on_reload_due()
                }

                () = wait_until(self.reconnect_at) => {
                    self.reconnect_at = None;
                    self.on_reconnect_due();
                    None
                }
            };

            if let Some(end) = end {
                self.teardown();
                return end;
            }
        }
    }

    /// Dispatch control message to handler
    fn dispatch(&mut self, msg: ClientMsg) -> Option<SessionEnd> {
        match msg {
            ClientMsg::Start => self.on_start(),
            ClientMsg::Reconnect => self.on_manual_reconnect(),
            ClientMsg::Disconnect => self.on_disconnect(),
            ClientMsg::Shutdown => {
                crate::debug!("client"; "shutting down");
                return Some(SessionEnd::Shutdown);
            }
        }
        None
    }

    /// Route a socket event, dropping events from replaced connections.
    fn on_socket(&mut self, generation: u64, event: SocketEvent) {
        if generation != self.generation || self.connection.is_none() {
            crate::debug!("client"; "stale {:?} from connection #{}", event, generation);
            return;
        }

        match event {
            SocketEvent::Open => self.on_open(),
            SocketEvent::Message(payload) => self.on_message(&payload),
            SocketEvent::Error(error) => self.on_error(&error),
            SocketEvent::Close => self.on_close(),
        }
    }
}

/// Sleep until the deadline (pends forever if None).
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
