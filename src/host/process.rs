//! Page reloaders.
//!
//! A reload tears the current page down. Bringing the next page up (restore,
//! relaunch, reconnect) is the session loop's job, exactly as a browser runs
//! the new document's load handlers after `location.reload()`.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{HostError, Reloader};

// =============================================================================
// ProcessPage
// =============================================================================

/// A child process standing in for the page.
///
/// `launch` starts it, `reload` stops it so the next page load can start a
/// fresh one.
#[derive(Debug)]
pub struct ProcessPage {
    program: OsString,
    args: Vec<OsString>,
    envs: Vec<(String, String)>,
    cwd: Option<PathBuf>,
    child: Mutex<Option<Child>>,
}

impl ProcessPage {
    /// Create from a command array (e.g., `["cargo", "run"]`).
    ///
    /// Returns `None` for an empty command.
    pub fn from_slice<S: Into<OsString> + Clone>(cmd: &[S]) -> Option<Self> {
        let (program, args) = cmd.split_first()?;
        Some(Self {
            program: program.clone().into(),
            args: args.iter().cloned().map(Into::into).collect(),
            envs: Vec::new(),
            cwd: None,
            child: Mutex::new(None),
        })
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Set working directory.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Human-readable command line for logs.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Start the child. A still-running previous child is stopped first.
    pub fn launch(&self) -> Result<u32, HostError> {
        self.terminate();

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        let child = command
            .spawn()
            .map_err(|e| HostError::Spawn(self.display(), e))?;
        let pid = child.id();
        crate::debug!("page"; "launched `{}` (pid {})", self.display(), pid);
        *self.child.lock() = Some(child);
        Ok(pid)
    }

    /// Stop the child if it is running.
    pub fn terminate(&self) {
        let Some(mut child) = self.child.lock().take() else {
            return;
        };
        if let Ok(Some(status)) = child.try_wait() {
            crate::debug!("page"; "`{}` already exited ({})", self.display(), status);
            return;
        }
        if let Err(e) = child.kill() {
            crate::debug!("page"; "failed to stop pid {}: {}", child.id(), e);
        }
        let _ = child.wait();
    }

    pub fn is_running(&self) -> bool {
        self.child
            .lock()
            .as_mut()
            .is_some_and(|child| matches!(child.try_wait(), Ok(None)))
    }
}

impl Reloader for ProcessPage {
    fn reload(&self) -> Result<(), HostError> {
        self.terminate();
        Ok(())
    }
}

impl Drop for ProcessPage {
    fn drop(&mut self) {
        self.terminate();
    }
}

// =============================================================================
// ReloadFlag
// =============================================================================

/// Reloader that only records that a reload was requested.
///
/// For hosts that react to `SessionEnd::Reloaded` themselves.
#[derive(Debug, Default)]
pub struct ReloadFlag {
    count: AtomicUsize,
}

impl ReloadFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Reloader for ReloadFlag {
    fn reload(&self) -> Result<(), HostError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command() {
        let empty: [&str; 0] = [];
        assert!(ProcessPage::from_slice(&empty).is_none());
    }

    #[test]
    fn test_display() {
        let page = ProcessPage::from_slice(&["cargo", "run", "--release"]).unwrap();
        assert_eq!(page.display(), "cargo run --release");
    }

    #[test]
    fn test_reload_flag_counts() {
        let flag = ReloadFlag::new();
        flag.reload().unwrap();
        flag.reload().unwrap();
        assert_eq!(flag.count(), 2);
    }

    #[test]
    fn test_spawn_failure() {
        let page = ProcessPage::from_slice(&["relive-test-no-such-binary"]).unwrap();
        assert!(matches!(page.launch(), Err(HostError::Spawn(..))));
        assert!(!page.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_and_reload_stops_child() {
        let page = ProcessPage::from_slice(&["sleep", "30"]).unwrap();
        page.launch().unwrap();
        assert!(page.is_running());

        page.reload().unwrap();
        assert!(!page.is_running());
    }
}
