//! Infrastructure implementation of the `RemoteExecutor` port.
//!
//! `SshChannel` spawns the system OpenSSH client once per call, so every
//! call performs its own handshake and owns its own connection. The client
//! is killed when the deadline fires, when a stream is closed, or when the
//! future is dropped (`kill_on_drop`).

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, Command};
use tokio::sync::mpsc;

use crate::application::ports::RemoteExecutor;
use crate::application::stream::{CancelToken, StreamEvent, StreamHandle};
use crate::domain::{ConnectionError, ConnectionParams, ExecResult};

/// Exit status the OpenSSH client reserves for its own failures.
const SSH_CLIENT_FAILURE: i32 = 255;

/// Events buffered between the transport and a slow consumer.
const STREAM_BUFFER: usize = 64;

const READ_CHUNK: usize = 8 * 1024;

/// Longest command passed as a client argument. Longer scripts (file writes)
/// go to a remote `sh -s` over stdin; the kernel caps a single argument at
/// 128 KiB.
const INLINE_COMMAND_LIMIT: usize = 64 * 1024;
const STDIN_SHELL: &str = "sh -s";

/// Printed on stderr by the remote shell before a streamed command starts,
/// marking the end of the handshake.
const STREAM_READY: &str = "dockhand-stream-ready";

const PASSWORD_ENV: &str = "DOCKHAND_SSH_PASSWORD";
const PASSPHRASE_ENV: &str = "DOCKHAND_SSH_PASSPHRASE";

/// Answers the client's prompts from the environment. OpenSSH passes the
/// prompt text as `$1`; key passphrase prompts mention "passphrase".
const ASKPASS_SCRIPT: &str = r#"#!/bin/sh
case "$1" in
  *assphrase*) printf '%s\n' "$DOCKHAND_SSH_PASSPHRASE" ;;
  *) printf '%s\n' "$DOCKHAND_SSH_PASSWORD" ;;
esac
"#;

/// Per-call credential files. The directory is removed on drop.
struct AuthFiles {
    _dir: tempfile::TempDir,
    key: Option<PathBuf>,
    askpass: Option<PathBuf>,
}

/// Production `RemoteExecutor` backed by the `ssh` binary.
pub struct SshChannel {
    params: ConnectionParams,
    program: PathBuf,
    program_args: Vec<OsString>,
}

impl SshChannel {
    #[must_use]
    pub fn new(params: ConnectionParams) -> Self {
        Self::with_program(params, "ssh", Vec::<OsString>::new())
    }

    /// Use a different client binary, invoked as `program program_args.. <ssh args>`.
    #[must_use]
    pub fn with_program(
        params: ConnectionParams,
        program: impl Into<PathBuf>,
        program_args: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        Self {
            params,
            program: program.into(),
            program_args: program_args.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Write key material and the askpass helper into a private directory.
    async fn auth_files(&self) -> Result<AuthFiles> {
        let key = self.params.private_key.clone();
        let askpass = self.params.needs_askpass();
        tokio::task::spawn_blocking(move || write_auth_files(key.as_deref(), askpass))
            .await
            .context("auth file task panicked")?
    }

    /// Client arguments, ending with the host and the remote command.
    fn ssh_args(&self, auth: &AuthFiles, command: &str, keepalive: bool) -> Vec<OsString> {
        let p = &self.params;
        let connect_secs = p.timeout_ms().div_ceil(1000).max(1);
        let mut args: Vec<OsString> = vec![
            "-T".into(),
            "-p".into(),
            p.port.to_string().into(),
            "-l".into(),
            p.username.clone().into(),
        ];
        let mut opt = |value: String| {
            args.push("-o".into());
            args.push(value.into());
        };
        opt(format!("ConnectTimeout={connect_secs}"));
        opt("StrictHostKeyChecking=accept-new".to_string());
        opt("LogLevel=ERROR".to_string());
        if auth.askpass.is_some() {
            opt("NumberOfPasswordPrompts=1".to_string());
        } else {
            opt("BatchMode=yes".to_string());
        }
        if let Some(known_hosts) = &p.known_hosts {
            opt(format!("UserKnownHostsFile={}", known_hosts.display()));
        }
        if keepalive {
            opt("ServerAliveInterval=15".to_string());
            opt("ServerAliveCountMax=3".to_string());
        }
        let identity = auth.key.as_deref().or(p.private_key_path.as_deref());
        if let Some(identity) = identity {
            opt("IdentitiesOnly=yes".to_string());
            args.push("-i".into());
            args.push(identity.as_os_str().to_owned());
        }
        args.push(p.host.clone().into());
        args.push(command.into());
        args
    }

    /// Start the client. With `script`, the remote command is `sh -s` and the
    /// caller feeds the script through the returned child's stdin.
    fn spawn(&self, auth: &AuthFiles, command: &str, script: bool, keepalive: bool) -> Result<Child> {
        let remote = if script { STDIN_SHELL } else { command };
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.program_args)
            .args(self.ssh_args(auth, remote, keepalive))
            .stdin(if script { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(askpass) = &auth.askpass {
            cmd.env("SSH_ASKPASS", askpass)
                .env("SSH_ASKPASS_REQUIRE", "force")
                .env(PASSWORD_ENV, self.params.password.as_deref().unwrap_or_default())
                .env(PASSPHRASE_ENV, self.params.passphrase.as_deref().unwrap_or_default());
            if std::env::var_os("DISPLAY").is_none() {
                cmd.env("DISPLAY", "dockhand:0");
            }
        }
        cmd.spawn().map_err(|e| {
            ConnectionError::Spawn(format!("{}: {e}", self.program.display())).into()
        })
    }
}

fn write_auth_files(key: Option<&[u8]>, askpass: bool) -> Result<AuthFiles> {
    let dir = tempfile::Builder::new()
        .prefix("dockhand-ssh-")
        .tempdir()
        .context("cannot create temporary directory for ssh credentials")?;
    let key = key
        .map(|material| {
            let path = dir.path().join("id");
            write_private(&path, material, 0o600)?;
            Ok::<_, anyhow::Error>(path)
        })
        .transpose()?;
    let askpass = askpass
        .then(|| {
            let path = dir.path().join("askpass.sh");
            write_private(&path, ASKPASS_SCRIPT.as_bytes(), 0o700)?;
            Ok::<_, anyhow::Error>(path)
        })
        .transpose()?;
    Ok(AuthFiles {
        _dir: dir,
        key,
        askpass,
    })
}

#[cfg(unix)]
fn write_private(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    use std::io::Write as _;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(mode)
        .open(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(content)
        .with_context(|| format!("cannot write {}", path.display()))?;
    // The client refuses keys without a trailing newline on some versions.
    if !content.ends_with(b"\n") {
        file.write_all(b"\n")
            .with_context(|| format!("cannot write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8], _mode: u32) -> Result<()> {
    let mut data = content.to_vec();
    if !data.ends_with(b"\n") {
        data.push(b'\n');
    }
    std::fs::write(path, data).with_context(|| format!("cannot write {}", path.display()))
}

/// The script to feed on stdin when `command` is too long for an argument.
fn stdin_script(command: &str) -> Option<Vec<u8>> {
    if command.len() <= INLINE_COMMAND_LIMIT {
        return None;
    }
    let mut script = command.as_bytes().to_vec();
    if !script.ends_with(b"\n") {
        script.push(b'\n');
    }
    Some(script)
}

/// Write the script and close stdin so the remote shell sees EOF.
async fn feed_stdin(stdin: Option<ChildStdin>, script: Option<Vec<u8>>) {
    let (Some(mut stdin), Some(script)) = (stdin, script) else {
        return;
    };
    if let Err(e) = stdin.write_all(&script).await {
        tracing::debug!(error = %e, "ssh client closed stdin early");
    }
}

/// Read stderr lines until the ready marker. Lines before it are kept in
/// `preamble`. Returns `false` when stderr ends first.
async fn await_ready(stderr: &mut BufReader<ChildStderr>, preamble: &mut Vec<u8>) -> bool {
    let mut line = Vec::new();
    loop {
        line.clear();
        match stderr.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => return false,
            Ok(_) if line.trim_ascii_end() == STREAM_READY.as_bytes() => return true,
            Ok(_) => preamble.extend_from_slice(&line),
        }
    }
}

async fn read_all(handle: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

/// Map a client exit to a transport error when ssh itself failed.
fn transport_failure(exit: Option<i32>, stdout_empty: bool, stderr: &[u8]) -> Option<ConnectionError> {
    if exit != Some(SSH_CLIENT_FAILURE) || !stdout_empty {
        return None;
    }
    let message = String::from_utf8_lossy(stderr).trim().to_string();
    Some(ConnectionError::Transport(if message.is_empty() {
        "ssh exited with status 255".to_string()
    } else {
        message
    }))
}

impl RemoteExecutor for SshChannel {
    async fn execute(&self, command: &str) -> Result<ExecResult> {
        tracing::debug!(host = %self.params.host, command, "ssh exec");
        let auth = self.auth_files().await?;
        let script = stdin_script(command);
        let mut child = self.spawn(&auth, command, script.is_some(), false)?;

        let cancel = CancelToken::new();
        let _deadline = cancel.arm_deadline(self.params.timeout);
        let stdin_handle = child.stdin.take();
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr, ()) = tokio::join!(
                    child.wait(),
                    read_all(stdout_handle),
                    read_all(stderr_handle),
                    feed_stdin(stdin_handle, script),
                );
                let status = status.context("waiting for ssh")?;
                Ok::<_, anyhow::Error>(ExecResult::new(stdout, stderr, status.code()))
            } => {
                let result = result?;
                if let Some(err) = transport_failure(result.exit_status, result.stdout.is_empty(), &result.stderr) {
                    tracing::debug!(%err, "ssh transport failure");
                    return Err(err.into());
                }
                tracing::debug!(exit = ?result.exit_status, "ssh exec finished");
                Ok(result)
            }
            () = cancel.cancelled() => {
                let _ = child.kill().await;
                tracing::warn!(host = %self.params.host, command, "ssh command timed out");
                Err(ConnectionError::Timeout { timeout_ms: self.params.timeout_ms() }.into())
            }
        }
    }

    async fn stream(&self, command: &str) -> Result<StreamHandle> {
        tracing::debug!(host = %self.params.host, command, "ssh stream");
        let auth = self.auth_files().await?;
        let command = format!("echo {STREAM_READY} >&2; {command}");
        let script = stdin_script(&command);
        let mut child = self.spawn(&auth, &command, script.is_some(), true)?;
        let stdin = child.stdin.take();
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let timeout_ms = self.params.timeout_ms();
        tokio::spawn(async move {
            tokio::join!(feed_stdin(stdin, script), pump(child, tx, token, timeout_ms));
            drop(auth);
        });
        Ok(StreamHandle::new(rx, cancel))
    }
}

/// Send unless the consumer closed the stream first. Returns `false` when
/// the stream should stop.
async fn deliver(tx: &mpsc::Sender<StreamEvent>, cancel: &CancelToken, event: StreamEvent) -> bool {
    tokio::select! {
        sent = tx.send(event) => sent.is_ok(),
        () = cancel.cancelled() => false,
    }
}

/// Where the handshake ended up before any output was forwarded.
enum Handshake {
    Ready,
    /// stderr closed without the ready marker: the client gave up.
    Exited,
    TimedOut,
    Closed,
}

/// Forward the client's stdout as events until it exits or is cancelled,
/// then report any failure and close exactly once. The handshake races
/// `timeout_ms`; once the remote shell is running the stream has no deadline.
async fn pump(mut child: Child, tx: mpsc::Sender<StreamEvent>, cancel: CancelToken, timeout_ms: u64) {
    let mut preamble = Vec::new();
    let mut stderr = child.stderr.take().map(BufReader::new);
    let handshake = match stderr.as_mut() {
        None => Handshake::Ready,
        Some(reader) => {
            let deadline = CancelToken::new();
            let _guard = deadline.arm_deadline(Duration::from_millis(timeout_ms));
            tokio::select! {
                ready = await_ready(reader, &mut preamble) => {
                    if ready { Handshake::Ready } else { Handshake::Exited }
                }
                () = deadline.cancelled() => Handshake::TimedOut,
                () = cancel.cancelled() => Handshake::Closed,
            }
        }
    };
    match handshake {
        Handshake::TimedOut => {
            let _ = child.kill().await;
            tracing::warn!(timeout_ms, "ssh stream handshake timed out");
            let err = ConnectionError::Timeout { timeout_ms };
            let _ = tx.send(StreamEvent::Error(err.to_string())).await;
            let _ = tx.send(StreamEvent::Closed).await;
            return;
        }
        Handshake::Exited => tracing::debug!("ssh client exited before the remote command started"),
        Handshake::Ready | Handshake::Closed => {}
    }

    let stderr_task = tokio::spawn(async move {
        let rest = read_all(stderr).await;
        preamble.extend(rest);
        preamble
    });
    let mut saw_output = false;

    if let Some(mut stdout) = child.stdout.take() {
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                read = stdout.read(&mut buf) => match read {
                    Ok(0) => break,
                    Ok(n) => {
                        saw_output = true;
                        if !deliver(&tx, &cancel, StreamEvent::Data(buf[..n].to_vec())).await {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        break;
                    }
                },
            }
        }
    }

    let closed_by_consumer = cancel.is_cancelled();
    if closed_by_consumer {
        let _ = child.kill().await;
    }
    let status = child.wait().await.ok().and_then(|s| s.code());
    let stderr = stderr_task.await.unwrap_or_default();

    if !closed_by_consumer {
        if let Some(err) = transport_failure(status, !saw_output, &stderr) {
            let _ = tx.send(StreamEvent::Error(err.to_string())).await;
        } else if status != Some(0) && !stderr.is_empty() {
            let message = String::from_utf8_lossy(&stderr).trim().to_string();
            let _ = tx.send(StreamEvent::Error(message)).await;
        }
    }
    tracing::debug!(exit = ?status, closed_by_consumer, "ssh stream finished");
    let _ = tx.send(StreamEvent::Closed).await;
}
