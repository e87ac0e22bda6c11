use argh::FromArgs;
use snafu::{ensure, ResultExt, Snafu};
use std::{
    net::{SocketAddr, UdpSocket},
    path::PathBuf,
    thread,
    time::Duration,
};

/// Payload of the datagram that marks the end of a stream.
pub const EOF_SENTINEL: &[u8] = b"EOF";

/// Largest UDP payload that still fits an unfragmented 1500-byte Ethernet frame.
pub const MAX_CHUNK_SIZE: usize = 1472;

/// Sends raw PCM audio to Mira over UDP to exercise the sound and network drivers.
///
/// The input has to be raw 48 kHz, 16-bit, mono samples already.
#[derive(FromArgs)]
#[argh(subcommand, name = "stream")]
pub struct Stream {
    /// address Mira listens on
    #[argh(option, default = "SocketAddr::from(([127, 0, 0, 1], 2026))")]
    addr: SocketAddr,

    /// maximum payload bytes per datagram. Mira's driver can't reassemble fragments.
    #[argh(option, default = "1024")]
    chunk_size: usize,

    /// delay between datagrams, in milliseconds
    #[argh(option, default = "1")]
    interval_ms: u64,

    /// the raw PCM input file
    #[argh(positional)]
    input: PathBuf,
}

#[derive(Debug, Snafu)]
pub enum StreamError {
    #[snafu(display("Chunk size must be between 1 and 1472 bytes, got {chunk_size}"))]
    InvalidChunkSize { chunk_size: usize },
    #[snafu(display("Failed to bind a local UDP socket"))]
    Bind { source: std::io::Error },
    #[snafu(display("Failed to send datagram {index} to {target}"))]
    Send {
        index: usize,
        target: SocketAddr,
        source: std::io::Error,
    },
}

/// Sends `pcm` to `target` in chunks of at most `chunk_size` bytes, followed by [`EOF_SENTINEL`].
///
/// Returns the number of audio datagrams sent, not counting the sentinel.
pub fn send_pcm(
    socket: &UdpSocket,
    target: SocketAddr,
    pcm: &[u8],
    chunk_size: usize,
    interval: Duration,
) -> Result<usize, StreamError> {
    ensure!(
        (1..=MAX_CHUNK_SIZE).contains(&chunk_size),
        InvalidChunkSizeSnafu { chunk_size }
    );

    let mut sent = 0;
    for (index, chunk) in pcm.chunks(chunk_size).enumerate() {
        socket
            .send_to(chunk, target)
            .context(SendSnafu { index, target })?;
        sent += 1;
        thread::sleep(interval);
    }

    socket
        .send_to(EOF_SENTINEL, target)
        .context(SendSnafu {
            index: sent,
            target,
        })?;

    Ok(sent)
}

pub fn run(options: Stream) -> Result<(), Box<dyn std::error::Error>> {
    let Stream {
        addr,
        chunk_size,
        interval_ms,
        input,
    } = options;

    let pcm = std::fs::read(&input)?;
    let bind_addr = if addr.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    };
    let socket = UdpSocket::bind(bind_addr).context(BindSnafu)?;

    log::info!(
        "Streaming {} bytes from `{}` to {addr}",
        pcm.len(),
        input.display()
    );

    let sent = send_pcm(
        &socket,
        addr,
        &pcm,
        chunk_size,
        Duration::from_millis(interval_ms),
    )?;

    log::info!("Sent {sent} datagrams and the end marker");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback() -> (UdpSocket, UdpSocket) {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        (sender, receiver)
    }

    fn receive_all(receiver: &UdpSocket) -> Vec<Vec<u8>> {
        let mut datagrams = Vec::new();
        let mut buf = [0; 2048];
        loop {
            let (len, _) = receiver.recv_from(&mut buf).unwrap();
            datagrams.push(buf[..len].to_vec());
            if &buf[..len] == EOF_SENTINEL {
                return datagrams;
            }
        }
    }

    #[test]
    fn splits_into_chunks_and_terminates() {
        let (sender, receiver) = loopback();
        let target = receiver.local_addr().unwrap();
        let pcm: Vec<u8> = (0..2500u32).map(|i| i as u8).collect();

        let sent = send_pcm(&sender, target, &pcm, 1024, Duration::from_millis(1)).unwrap();
        assert_eq!(sent, 3);

        let datagrams = receive_all(&receiver);
        let lengths: Vec<usize> = datagrams.iter().map(Vec::len).collect();
        assert_eq!(lengths, [1024, 1024, 452, 3]);
        assert_eq!(datagrams[..3].concat(), pcm);
    }

    #[test]
    fn empty_input_sends_only_the_sentinel() {
        let (sender, receiver) = loopback();
        let target = receiver.local_addr().unwrap();

        let sent = send_pcm(&sender, target, &[], 1024, Duration::ZERO).unwrap();
        assert_eq!(sent, 0);
        assert_eq!(receive_all(&receiver), [b"EOF".to_vec()]);
    }

    #[test]
    fn rejects_fragmenting_chunk_sizes() {
        let (sender, receiver) = loopback();
        let target = receiver.local_addr().unwrap();

        for chunk_size in [0, MAX_CHUNK_SIZE + 1] {
            assert!(matches!(
                send_pcm(&sender, target, &[1, 2, 3], chunk_size, Duration::ZERO),
                Err(StreamError::InvalidChunkSize { .. })
            ));
        }
    }
}
