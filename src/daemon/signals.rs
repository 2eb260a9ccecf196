//! OS signal adapter: turns process signals into a [`ShutdownReason`]
//!
//! Handlers are registered by [`ShutdownSignals::install`], not on first
//! poll, so a signal arriving during the initial pass is already caught.

use super::ShutdownReason;
use std::io;

/// Registered SIGTERM, SIGHUP and SIGINT streams
#[cfg(unix)]
#[derive(Debug)]
pub struct ShutdownSignals {
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    /// Register the handlers now; must be called inside a Tokio runtime
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            hangup: signal(SignalKind::hangup())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for the first of SIGTERM, SIGHUP or SIGINT
    pub async fn recv(&mut self) -> io::Result<ShutdownReason> {
        let received = tokio::select! {
            received = self.terminate.recv() => received.map(|()| ShutdownReason::Terminate),
            received = self.hangup.recv() => received.map(|()| ShutdownReason::Hangup),
            received = self.interrupt.recv() => received.map(|()| ShutdownReason::Interrupt),
        };
        received.ok_or_else(|| io::Error::new(io::ErrorKind::Other, "signal driver shut down"))
    }
}

/// Registered Ctrl-C stream
#[cfg(windows)]
#[derive(Debug)]
pub struct ShutdownSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl ShutdownSignals {
    /// Register the handler now; must be called inside a Tokio runtime
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    /// Wait for Ctrl-C
    pub async fn recv(&mut self) -> io::Result<ShutdownReason> {
        self.ctrl_c
            .recv()
            .await
            .map(|()| ShutdownReason::Interrupt)
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "signal driver shut down"))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_installed_handler_catches_hangup_before_first_poll() {
        let mut signals = ShutdownSignals::install().expect("install handlers");

        // Delivered before recv() is ever polled
        let status = Command::new("kill")
            .arg("-HUP")
            .arg(std::process::id().to_string())
            .status()
            .expect("run kill");
        assert!(status.success());

        let reason = timeout(Duration::from_secs(5), signals.recv())
            .await
            .expect("signal within timeout")
            .expect("signal driver alive");
        assert_eq!(reason, ShutdownReason::Hangup);
    }
}
