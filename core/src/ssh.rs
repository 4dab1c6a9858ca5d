//! SSH implementation of the session boundary, built on `ssh2` (libssh2).
//!
//! All calls here block. The batch runner moves every target onto its own blocking worker,
//! and the configured timeout is applied to the TCP connect and to the libssh2 session so
//! a stalled host eventually releases its worker. Triggering the session's [`Interrupt`]
//! shuts the socket down, which fails whatever libssh2 call is in progress.
//!
//! Host keys are not verified; targets are addressed by IP and authenticated by password
//! only.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use ssh2::{ExtendedData, Session};
use tracing::{debug, trace};

use orchestrate_common::config::Config;
use orchestrate_common::error::RemoteError;
use orchestrate_common::fleet::target::Target;
use orchestrate_common::session::{
    CommandOutput, Interrupt, Invocation, RemoteSession, SessionConnector,
};

/// Opens password-authenticated SSH sessions.
#[derive(Debug, Clone)]
pub struct SshConnector {
    port: u16,
    timeout: Duration,
}

impl SshConnector {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

impl From<&Config> for SshConnector {
    fn from(cfg: &Config) -> Self {
        Self::new(cfg.port, cfg.timeout)
    }
}

impl SessionConnector for SshConnector {
    fn open(
        &self,
        target: &Target,
        interrupt: &Interrupt,
    ) -> Result<Box<dyn RemoteSession>, RemoteError> {
        let endpoint = endpoint(&target.ip, self.port);
        let connection_failed = |reason: String| RemoteError::ConnectionFailed {
            addr: endpoint.clone(),
            reason,
        };

        let addr: SocketAddr = (target.ip.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| connection_failed(e.to_string()))?
            .next()
            .ok_or_else(|| connection_failed("address did not resolve".to_string()))?;

        debug!("connecting to {addr}");
        let tcp = TcpStream::connect_timeout(&addr, self.timeout)
            .map_err(|e| connection_failed(e.to_string()))?;
        watch(&tcp, interrupt, &endpoint);

        let mut session = Session::new().map_err(|e| connection_failed(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(timeout_millis(self.timeout));
        session
            .handshake()
            .map_err(|e| connection_failed(format!("handshake failed: {e}")))?;

        let auth_failed = |reason: String| RemoteError::AuthenticationFailed {
            user: target.user.clone(),
            addr: endpoint.clone(),
            reason,
        };

        session
            .userauth_password(&target.user, &target.pass)
            .map_err(|e| auth_failed(e.to_string()))?;

        if !session.authenticated() {
            return Err(auth_failed("server did not accept the password".to_string()));
        }

        debug!("authenticated as {} on {endpoint}", target.user);
        Ok(Box::new(SshSession { session, endpoint }))
    }
}

/// One authenticated connection. Disconnects when dropped.
pub struct SshSession {
    session: Session,
    endpoint: String,
}

impl SshSession {
    fn transport_error(&self, e: impl std::fmt::Display) -> RemoteError {
        RemoteError::Transport {
            reason: format!("{}: {e}", self.endpoint),
        }
    }
}

impl RemoteSession for SshSession {
    fn execute(self: Box<Self>, invocation: &Invocation) -> Result<CommandOutput, RemoteError> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| self.transport_error(e))?;

        // stderr has to be folded into stdout before the command starts.
        channel
            .handle_extended_data(ExtendedData::Merge)
            .map_err(|e| self.transport_error(e))?;

        trace!("exec on {}: {}", self.endpoint, invocation.command);
        channel
            .exec(&invocation.command)
            .map_err(|e| self.transport_error(e))?;

        if let Some(stdin) = &invocation.stdin {
            channel
                .write_all(stdin.as_bytes())
                .map_err(|e| self.transport_error(e))?;
        }
        channel.send_eof().map_err(|e| self.transport_error(e))?;

        let mut output: Vec<u8> = Vec::new();
        channel
            .read_to_end(&mut output)
            .map_err(|e| self.transport_error(e))?;

        channel.wait_close().map_err(|e| self.transport_error(e))?;
        let signal = channel
            .exit_signal()
            .map_err(|e| self.transport_error(e))?
            .exit_signal;
        let status = channel.exit_status().map_err(|e| self.transport_error(e))?;

        match &signal {
            Some(name) => debug!("{} killed by SIG{name}", self.endpoint),
            None => debug!("{} exited with {status}", self.endpoint),
        }
        Ok(CommandOutput {
            output,
            exit_status: exit_code(signal.as_deref(), status),
        })
    }

    fn transfer(self: Box<Self>, local_path: &Path, remote_path: &str) -> Result<(), RemoteError> {
        let transfer_failed = |reason: String| RemoteError::TransferFailed { reason };

        let mut local = std::fs::File::open(local_path)
            .map_err(|e| transfer_failed(format!("{}: {e}", local_path.display())))?;
        let metadata = local
            .metadata()
            .map_err(|e| transfer_failed(format!("{}: {e}", local_path.display())))?;
        if !metadata.is_file() {
            return Err(transfer_failed(format!(
                "{} is not a regular file",
                local_path.display()
            )));
        }

        let sftp = self
            .session
            .sftp()
            .map_err(|e| transfer_failed(format!("cannot open SFTP channel: {e}")))?;
        let mut remote = sftp
            .create(Path::new(remote_path))
            .map_err(|e| transfer_failed(format!("{}:{remote_path}: {e}", self.endpoint)))?;

        let copied = send_file(&mut local, &mut remote)
            .map_err(|e| transfer_failed(format!("{}:{remote_path}: {e}", self.endpoint)))?;

        debug!("copied {copied} bytes to {}:{remote_path}", self.endpoint);
        Ok(())
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        if let Err(e) = self.session.disconnect(None, "session finished", None) {
            trace!("disconnect from {} failed: {e}", self.endpoint);
        }
    }
}

/// Registers a clone of `tcp` that `interrupt` shuts down.
fn watch(tcp: &TcpStream, interrupt: &Interrupt, endpoint: &str) {
    match tcp.try_clone() {
        Ok(socket) => interrupt.on_trigger(move || {
            let _ = socket.shutdown(Shutdown::Both);
        }),
        Err(e) => debug!("cannot watch {endpoint} for interrupts: {e}"),
    }
}

/// A remote file being written. The write only counts once `finish` succeeds.
trait UploadSink: Write {
    fn finish(&mut self) -> io::Result<()>;
}

impl UploadSink for ssh2::File {
    fn finish(&mut self) -> io::Result<()> {
        self.close().map_err(io::Error::from)
    }
}

fn send_file(local: &mut impl Read, remote: &mut impl UploadSink) -> io::Result<u64> {
    let copied = io::copy(local, remote)?;
    remote.flush()?;
    remote.finish()?;
    Ok(copied)
}

/// A command that died from a signal has no exit status, whatever libssh2 reports.
fn exit_code(signal: Option<&str>, status: i32) -> Option<i32> {
    match signal {
        Some(_) => None,
        None => Some(status),
    }
}

fn endpoint(ip: &str, port: u16) -> String {
    if ip.contains(':') {
        format!("[{ip}]:{port}")
    } else {
        format!("{ip}:{port}")
    }
}

fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
