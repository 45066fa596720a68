mod udp;

pub use udp::UdpDatagramSource;

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// One received datagram together with its sender, when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub data: Vec<u8>,
    pub peer: Option<SocketAddr>,
}

impl Datagram {
    pub fn new(data: impl Into<Vec<u8>>, peer: Option<SocketAddr>) -> Self {
        Self {
            data: data.into(),
            peer,
        }
    }
}

/// Blocking supplier of datagrams for the receive loop.
pub trait DatagramSource {
    fn recv_datagram(&mut self) -> Result<Datagram, TransportError>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("socket I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("datagram source closed")]
    Closed,
}

impl TransportError {
    /// Whether the source can no longer deliver datagrams.
    pub fn is_fatal(&self) -> bool {
        match self {
            TransportError::Closed => true,
            TransportError::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::NotConnected
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::InvalidInput
                    | io::ErrorKind::Unsupported
            ),
        }
    }

    /// Whether the receive simply did not complete and can be retried at once.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Closed => false,
            TransportError::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
        }
    }
}
