use argh::FromArgs;
use snafu::{ResultExt, Snafu};
use std::{
    io::{self, ErrorKind, Read, Write},
    net::{SocketAddr, TcpStream},
    thread,
    time::Duration,
};

/// Shows MiraOS serial logs forwarded by QEMU over TCP, with a timestamp on every line.
///
/// Keeps reconnecting until interrupted, so it can be left running across QEMU restarts.
#[derive(FromArgs)]
#[argh(subcommand, name = "serial")]
pub struct Serial {
    /// address of QEMU's serial socket
    #[argh(option, default = "SocketAddr::from(([127, 0, 0, 1], 6472))")]
    addr: SocketAddr,

    /// delay before reconnecting, in milliseconds
    #[argh(option, default = "1000")]
    retry_ms: u64,
}

/// Splits received bytes into `\n`-terminated lines.
///
/// Lines are decoded only once complete, so multi-byte characters split across reads survive.
/// Invalid UTF-8 is dropped.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn push(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    pub fn next_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let line = decode_lossy(&self.pending[..end]);
        self.pending.drain(..=end);
        Some(line)
    }

    /// Takes whatever is left after the last newline.
    pub fn take_rest(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }

        let rest = decode_lossy(&self.pending);
        self.pending.clear();
        Some(rest)
    }
}

fn decode_lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

pub fn local_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

#[derive(Debug, Snafu)]
pub enum TailError {
    #[snafu(display("Failed to read from the serial socket"))]
    Read { source: io::Error },
    #[snafu(display("Failed to write the log output"))]
    Write { source: io::Error },
}

impl TailError {
    /// Whether QEMU went away, as opposed to anything on our side failing.
    pub fn is_disconnect(&self) -> bool {
        match self {
            TailError::Read { source } => matches!(
                source.kind(),
                ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe
            ),
            TailError::Write { .. } => false,
        }
    }
}

#[derive(Debug, Snafu)]
pub enum SerialError {
    #[snafu(display("Failed to connect to {addr}"))]
    Connect { addr: SocketAddr, source: io::Error },
    #[snafu(display("Serial session with {addr} failed"))]
    Tail { addr: SocketAddr, source: TailError },
}

/// How a single connection attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// Nothing is listening yet.
    Refused,
    /// QEMU closed the socket.
    Closed,
    /// The connection was reset, usually because QEMU exited.
    Stopped,
}

/// Copies lines from `reader` to `out` until the peer closes the connection.
///
/// A trailing partial line is flushed on close. Errors are returned as-is, with any partial line
/// discarded.
pub fn tail<R, W, F>(mut reader: R, mut out: W, mut timestamp: F) -> Result<(), TailError>
where
    R: Read,
    W: Write,
    F: FnMut() -> String,
{
    let mut lines = LineBuffer::default();
    let mut buf = [0; 1024];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context(ReadSnafu),
        };

        lines.push(&buf[..n]);
        while let Some(line) = lines.next_line() {
            writeln!(out, "[{}] {line}", timestamp()).context(WriteSnafu)?;
        }
        out.flush().context(WriteSnafu)?;
    }

    if let Some(rest) = lines.take_rest() {
        writeln!(out, "[{}] {rest}", timestamp()).context(WriteSnafu)?;
        out.flush().context(WriteSnafu)?;
    }

    Ok(())
}

/// Connects to `addr` once and tails it until the connection ends.
pub fn session<W, F>(addr: SocketAddr, mut out: W, timestamp: F) -> Result<Session, SerialError>
where
    W: Write,
    F: FnMut() -> String,
{
    let stream = match TcpStream::connect(addr) {
        Ok(stream) => stream,
        Err(e) if e.kind() == ErrorKind::ConnectionRefused => return Ok(Session::Refused),
        Err(e) => return Err(e).context(ConnectSnafu { addr }),
    };

    log::info!("Connected to QEMU on {addr}");
    writeln!(out, "--- Starting Debug Log ---")
        .context(WriteSnafu)
        .context(TailSnafu { addr })?;

    match tail(stream, &mut out, timestamp) {
        Ok(()) => Ok(Session::Closed),
        Err(e) if e.is_disconnect() => {
            writeln!(out, "--- Log Stopped (QEMU likely exited) ---")
                .context(WriteSnafu)
                .context(TailSnafu { addr })?;
            Ok(Session::Stopped)
        }
        Err(e) => Err(e).context(TailSnafu { addr }),
    }
}

/// Keeps running sessions against `addr`, waiting `retry` between attempts.
///
/// Returns once `sessions` connections have ended, or never if it is `None`.
pub fn watch<W, F>(
    addr: SocketAddr,
    retry: Duration,
    mut out: W,
    mut timestamp: F,
    sessions: Option<usize>,
) -> Result<(), SerialError>
where
    W: Write,
    F: FnMut() -> String,
{
    let mut ended = 0;

    loop {
        match session(addr, &mut out, &mut timestamp)? {
            Session::Refused => log::debug!("{addr} refused the connection, retrying"),
            Session::Closed => {
                log::info!("QEMU closed the connection");
                ended += 1;
            }
            Session::Stopped => ended += 1,
        }

        if sessions.is_some_and(|limit| ended >= limit) {
            return Ok(());
        }

        thread::sleep(retry);
    }
}

pub fn run(options: Serial) -> Result<(), Box<dyn std::error::Error>> {
    let Serial { addr, retry_ms } = options;

    log::info!("Waiting for QEMU on {addr}");

    watch(
        addr,
        Duration::from_millis(retry_ms),
        io::stdout().lock(),
        local_timestamp,
        None,
    )?;

    Ok(())
}
