//! `relive connect`: the page-load loop.
//!
//! ```text
//! load:   restore snapshot -> launch page command -> spawn client -> start
//! reload: client saves snapshot, page command stops, session ends -> load
//! ```
//!
//! Stdin lines drive the exported controls: `r` reconnect, `d` disconnect,
//! `q` quit. Ctrl+C quits.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::actor::{ClientHandle, ReloadClient, SessionEnd};
use crate::config::ClientConfig;
use crate::core::{PageLocation, is_shutdown, register_shutdown_notifier, request_shutdown};
use crate::host::{FileStore, HostPage, JsonFileState, ProcessPage, ReloadFlag, Reloader};
use crate::reload::RestoreOutcome;
use crate::{debug, log};

/// Environment variable telling the page command where its state file is.
pub const STATE_ENV: &str = "RELIVE_STATE";

/// Operator input, from stdin or Ctrl+C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Reconnect,
    Disconnect,
    Quit,
}

impl Control {
    /// Parse one stdin line. Blank lines give `None`.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        match line.trim() {
            "" => None,
            "r" | "reconnect" => Some(Ok(Self::Reconnect)),
            "d" | "disconnect" => Some(Ok(Self::Disconnect)),
            "q" | "quit" => Some(Ok(Self::Quit)),
            other => Some(Err(other.to_string())),
        }
    }
}

/// Run `relive connect` until quit.
pub fn run_connect(config: &ClientConfig, page_url: &str, force: bool) -> Result<()> {
    let location = PageLocation::parse(page_url)?;
    let (page, process) = build_page(config, location)?;

    let (tx, rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx.clone());
    register_shutdown_notifier(move || {
        let _ = tx.send(Control::Quit);
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let result = runtime.block_on(session_loop(config, page, process.as_deref(), force, rx));

    if let Some(process) = &process {
        process.terminate();
    }
    result
}

/// Bind the page capabilities to the filesystem and the page command.
fn build_page(
    config: &ClientConfig,
    location: PageLocation,
) -> Result<(HostPage, Option<Arc<ProcessPage>>)> {
    let store = Arc::new(FileStore::new(&config.page.store_dir));

    let process = ProcessPage::from_slice(&config.page.command).map(|process| {
        let process = process.cwd(config.get_root());
        let process = match &config.page.state {
            Some(state) => process.env(STATE_ENV, state.display().to_string()),
            None => process,
        };
        Arc::new(process)
    });
    let reloader: Arc<dyn Reloader> = match &process {
        Some(process) => process.clone(),
        None => Arc::new(ReloadFlag::new()),
    };

    let mut page = HostPage::new(location, store, reloader);
    if let Some(state) = &config.page.state {
        page = page.with_state(Arc::new(JsonFileState::new(state)));
    }

    debug!("relive"; "page: {:?}", page);
    Ok((page, process))
}

async fn session_loop(
    config: &ClientConfig,
    page: HostPage,
    process: Option<&ProcessPage>,
    force: bool,
    mut control: mpsc::UnboundedReceiver<Control>,
) -> Result<()> {
    let settings = config.client_settings();

    if !force && !page.location().is_allowed(&settings.allow_hosts) {
        log!(
            "relive";
            "`{}` is not a development host, press `r` or pass --force to connect",
            page.location().hostname()
        );
    }

    while !is_shutdown() {
        let client = ReloadClient::new(page.clone(), settings.clone());
        report_restore(client.restore_on_load());

        if let Some(process) = process {
            let pid = process
                .launch()
                .with_context(|| format!("failed to start `{}`", process.display()))?;
            debug!("relive"; "started `{}` (pid {})", process.display(), pid);
        }

        let (handle, mut session) = client.spawn();
        if force {
            handle.reconnect().await;
        } else {
            handle.start().await;
        }

        let mut control_open = true;
        let end = loop {
            tokio::select! {
                end = &mut session => break end.context("reload client panicked")?,
                cmd = control.recv(), if control_open => match cmd {
                    Some(cmd) => apply_control(&handle, cmd).await,
                    None => {
                        control_open = false;
                        handle.shutdown().await;
                    }
                },
            }
        };

        match end {
            SessionEnd::Reloaded => log!("reload"; "page reloaded"),
            SessionEnd::Shutdown => break,
        }
    }

    Ok(())
}

async fn apply_control(handle: &ClientHandle, cmd: Control) {
    match cmd {
        Control::Reconnect => handle.reconnect().await,
        Control::Disconnect => handle.disconnect().await,
        Control::Quit => {
            request_shutdown();
            handle.shutdown().await;
        }
    }
}

fn report_restore(outcome: Result<RestoreOutcome, crate::host::HostError>) {
    match outcome {
        Ok(RestoreOutcome::Restored { fields }) => {
            log!("reload"; "restored {} state field(s)", fields);
        }
        Ok(RestoreOutcome::NoState) => {
            debug!("reload"; "snapshot dropped, no state file configured");
        }
        // Discarded snapshots are already reported as a warning
        Ok(RestoreOutcome::NoSnapshot | RestoreOutcome::Discarded { .. }) => {}
        Err(e) => log!("warning"; "failed to restore state: {}", e),
    }
}

/// Forward stdin commands until EOF.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<Control>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match Control::parse(&line) {
                Some(Ok(cmd)) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                Some(Err(other)) => {
                    log!("relive"; "unknown command `{}` (r: reconnect, d: disconnect, q: quit)", other);
                }
                None => {}
            }
        }
        debug!("relive"; "stdin closed");
    });
}
