use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::errors::TransportError;
use crate::message::{Envelope, Reply};

/// A request/response channel to one bot.
///
/// Implementations do not apply timeouts or retries themselves; the client
/// wraps every call in both.
#[async_trait]
pub trait Transport: Send {
    /// Human-readable address used in logs and errors.
    fn endpoint(&self) -> &str;

    /// Open the channel. A failure here is always [`TransportError::Connect`].
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// One round-trip. Connects lazily if needed.
    async fn call(&mut self, envelope: &Envelope) -> Result<Reply, TransportError>;
}

/// Longest reply line accepted by default, newline included.
pub const DEFAULT_MAX_REPLY_BYTES: usize = 1 << 20;

/// Newline-delimited JSON over TCP: one request line, one reply line.
#[derive(Debug)]
pub struct TcpTransport {
    address: String,
    connect_timeout: Duration,
    max_reply_bytes: usize,
    stream: Option<BufReader<TcpStream>>,
    /// Set while a request is outstanding. If a call is dropped mid-way (for
    /// example by a timeout), its reply may still arrive later, so the
    /// connection cannot be reused.
    in_flight: bool,
}

impl TcpTransport {
    pub fn new(address: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            address: address.into(),
            connect_timeout,
            max_reply_bytes: DEFAULT_MAX_REPLY_BYTES,
            stream: None,
            in_flight: false,
        }
    }

    /// Cap the reply line length. A longer reply is malformed and the
    /// connection is dropped.
    pub fn with_max_reply_bytes(mut self, max_reply_bytes: usize) -> Self {
        self.max_reply_bytes = max_reply_bytes;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn open(&self) -> Result<BufReader<TcpStream>, TransportError> {
        let connect = TcpStream::connect(self.address.as_str());
        let stream = match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(self.connect_error(source)),
            Err(_) => {
                return Err(self.connect_error(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "connect timed out",
                )))
            }
        };
        stream.set_nodelay(true)?;
        Ok(BufReader::new(stream))
    }

    fn connect_error(&self, source: io::Error) -> TransportError {
        TransportError::Connect {
            endpoint: self.address.clone(),
            source,
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    fn endpoint(&self) -> &str {
        &self.address
    }

    async fn connect(&mut self) -> Result<(), TransportError> {
        self.stream = Some(self.open().await?);
        self.in_flight = false;
        tracing::debug!(endpoint = %self.address, "connected");
        Ok(())
    }

    async fn call(&mut self, envelope: &Envelope) -> Result<Reply, TransportError> {
        if self.in_flight {
            tracing::debug!(endpoint = %self.address, "dropping connection with a stale request");
            self.stream = None;
            self.in_flight = false;
        }
        if self.stream.is_none() {
            self.connect().await?;
        }

        let mut line = serde_json::to_string(envelope)
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        line.push('\n');

        let Some(stream) = self.stream.as_mut() else {
            return Err(TransportError::Closed);
        };
        self.in_flight = true;

        // nothing has been answered yet, so a failed write counts as a
        // connection failure
        if let Err(source) = write_line(stream, &line).await {
            self.stream = None;
            self.in_flight = false;
            return Err(TransportError::Connect {
                endpoint: self.address.clone(),
                source,
            });
        }

        let limit = self.max_reply_bytes;
        let mut reply = Vec::new();
        let read = (&mut *stream)
            .take(limit as u64)
            .read_until(b'\n', &mut reply)
            .await;
        self.in_flight = false;
        match read {
            Ok(0) => {
                self.stream = None;
                Err(TransportError::Closed)
            }
            Ok(n) if n == limit && reply.last() != Some(&b'\n') => {
                // the rest of the line is still queued on the socket
                self.stream = None;
                Err(TransportError::Malformed(format!("reply exceeds {limit} bytes")))
            }
            Ok(_) => serde_json::from_slice(&reply)
                .map_err(|e| TransportError::Malformed(e.to_string())),
            Err(e) => {
                self.stream = None;
                Err(TransportError::Io(e))
            }
        }
    }
}

async fn write_line(stream: &mut BufReader<TcpStream>, line: &str) -> io::Result<()> {
    let writer = stream.get_mut();
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
