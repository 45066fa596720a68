use std::net::{Ipv4Addr, SocketAddr};
use std::ops::ControlFlow;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::protocols::common::hex::encode_hex;
use crate::protocols::icast::error::{ArityError, DecodeError};
use crate::publish::{PublishError, SnapshotPublisher};
use crate::source::{Datagram, DatagramSource, TransportError, UdpDatagramSource};
use crate::{DEFAULT_OUTPUT, DEFAULT_PORT, RECV_BUFFER_LEN, ScoreboardFacts, decode_datagram};

/// Consecutive unclassified receive failures tolerated before the socket is
/// considered dead. Retryable failures such as `EINTR` never count.
pub const MAX_CONSECUTIVE_TRANSPORT_ERRORS: u32 = 16;

/// Every failure the receive loop can observe, by pipeline stage.
#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("arity error: {0}")]
    Arity(#[from] ArityError),
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Network and output settings handed to the receiver at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
    pub bind_addr: SocketAddr,
    pub output: PathBuf,
    pub recv_buffer_len: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            output: PathBuf::from(DEFAULT_OUTPUT),
            recv_buffer_len: RECV_BUFFER_LEN,
        }
    }
}

/// Diagnostic counters accumulated by the receive loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiveStats {
    pub datagrams: u64,
    pub published: u64,
    pub decode_errors: u64,
    pub arity_errors: u64,
    pub publish_errors: u64,
    pub transport_errors: u64,
}

/// Single-threaded decode-and-publish loop over a datagram source.
pub struct Receiver<S> {
    source: S,
    publisher: SnapshotPublisher,
    stats: ReceiveStats,
    consecutive_transport_errors: u32,
}

impl Receiver<UdpDatagramSource> {
    /// Bind the configured UDP socket and target the configured snapshot path.
    pub fn bind(config: &ReceiverConfig) -> Result<Self, TransportError> {
        let source = UdpDatagramSource::bind(config.bind_addr, config.recv_buffer_len)?;
        Ok(Self::new(source, SnapshotPublisher::new(&config.output)))
    }
}

impl<S: DatagramSource> Receiver<S> {
    pub fn new(source: S, publisher: SnapshotPublisher) -> Self {
        Self {
            source,
            publisher,
            stats: ReceiveStats::default(),
            consecutive_transport_errors: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn publisher(&self) -> &SnapshotPublisher {
        &self.publisher
    }

    pub fn stats(&self) -> ReceiveStats {
        self.stats
    }

    /// Decode, normalize and publish one datagram.
    pub fn process(&mut self, datagram: &Datagram) -> Result<ScoreboardFacts, ReceiveError> {
        let facts = decode_datagram(&datagram.data)?;
        self.publisher.publish(&facts)?;
        self.stats.published += 1;
        debug!(
            peer = %display_peer(datagram.peer),
            time_type = %facts.time_type,
            score = %facts.score,
            "snapshot published"
        );
        Ok(facts)
    }

    /// Run until the source closes or fails beyond recovery.
    ///
    /// Returns the counters on a normal close and the transport error when the
    /// socket became unusable.
    pub fn run(&mut self) -> Result<ReceiveStats, TransportError> {
        info!(output = %self.publisher.path().display(), "receiver started");
        loop {
            let flow = match self.source.recv_datagram() {
                Ok(datagram) => {
                    self.consecutive_transport_errors = 0;
                    self.stats.datagrams += 1;
                    match self.process(&datagram) {
                        Ok(_) => ControlFlow::Continue(()),
                        Err(err) => self.dispatch(err, Some(&datagram)),
                    }
                }
                Err(err) => self.dispatch(ReceiveError::Transport(err), None),
            };
            if let ControlFlow::Break(result) = flow {
                info!(
                    datagrams = self.stats.datagrams,
                    published = self.stats.published,
                    decode_errors = self.stats.decode_errors,
                    arity_errors = self.stats.arity_errors,
                    publish_errors = self.stats.publish_errors,
                    transport_errors = self.stats.transport_errors,
                    "receiver stopped"
                );
                return result;
            }
        }
    }

    fn dispatch(
        &mut self,
        err: ReceiveError,
        datagram: Option<&Datagram>,
    ) -> ControlFlow<Result<ReceiveStats, TransportError>> {
        match err {
            ReceiveError::Decode(_) | ReceiveError::Arity(_) => {
                if matches!(err, ReceiveError::Decode(_)) {
                    self.stats.decode_errors += 1;
                } else {
                    self.stats.arity_errors += 1;
                }
                let (peer, raw) = datagram
                    .map(|d| (display_peer(d.peer), encode_hex(&d.data)))
                    .unwrap_or_default();
                warn!(peer = %peer, raw = %raw, error = %err, "discarding malformed datagram");
                ControlFlow::Continue(())
            }
            ReceiveError::Publish(err) => {
                self.stats.publish_errors += 1;
                error!(
                    output = %self.publisher.path().display(),
                    error = %err,
                    "failed to publish snapshot"
                );
                ControlFlow::Continue(())
            }
            ReceiveError::Transport(TransportError::Closed) => {
                info!("datagram source closed");
                ControlFlow::Break(Ok(self.stats))
            }
            ReceiveError::Transport(err) => {
                self.stats.transport_errors += 1;
                if err.is_retryable() {
                    debug!(error = %err, "receive interrupted, retrying");
                    return ControlFlow::Continue(());
                }
                self.consecutive_transport_errors += 1;
                if err.is_fatal()
                    || self.consecutive_transport_errors >= MAX_CONSECUTIVE_TRANSPORT_ERRORS
                {
                    error!(error = %err, "receive failed, stopping");
                    return ControlFlow::Break(Err(err));
                }
                warn!(error = %err, "receive failed");
                ControlFlow::Continue(())
            }
        }
    }
}

fn display_peer(peer: Option<SocketAddr>) -> String {
    peer.map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::encode_message;

    type Event = Result<Datagram, TransportError>;

    struct ScriptedSource {
        events: VecDeque<Result<Datagram, TransportError>>,
    }

    impl ScriptedSource {
        fn new(events: Vec<Result<Datagram, TransportError>>) -> Self {
            Self {
                events: events.into(),
            }
        }
    }

    impl DatagramSource for ScriptedSource {
        fn recv_datagram(&mut self) -> Result<Datagram, TransportError> {
            self.events
                .pop_front()
                .unwrap_or(Err(TransportError::Closed))
        }
    }

    fn datagram(message: &str) -> Result<Datagram, TransportError> {
        Ok(Datagram::new(encode_message(message).unwrap(), None))
    }

    #[test]
    fn default_config_matches_protocol_constants() {
        let config = ReceiverConfig::default();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:50078");
        assert_eq!(config.output, PathBuf::from("match-facts.json"));
        assert_eq!(config.recv_buffer_len, 1024);
    }

    #[test]
    fn counts_each_outcome() {
        let temp = tempfile::tempdir().unwrap();
        let source = ScriptedSource::new(vec![
            datagram("12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME"),
            datagram("too;short"),
            Ok(Datagram::new(vec![0, 0, 0, 0xff], None)),
            Err(TransportError::Io(io::Error::from(io::ErrorKind::Interrupted))),
            datagram("12:35;2;1;2;;;;;;;Lions;Tigers;GAME TIME"),
        ]);
        let mut receiver = Receiver::new(
            source,
            SnapshotPublisher::new(temp.path().join("match-facts.json")),
        );

        let stats = receiver.run().unwrap();

        assert_eq!(
            stats,
            ReceiveStats {
                datagrams: 4,
                published: 2,
                decode_errors: 1,
                arity_errors: 1,
                publish_errors: 0,
                transport_errors: 1,
            }
        );
    }

    #[test]
    fn publish_failure_is_not_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("missing").join("match-facts.json");
        let source = ScriptedSource::new(vec![
            datagram("12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME"),
            datagram("12:35;2;1;2;;;;;;;Lions;Tigers;GAME TIME"),
        ]);
        let mut receiver = Receiver::new(source, SnapshotPublisher::new(&output));

        let stats = receiver.run().unwrap();

        assert_eq!(stats.datagrams, 2);
        assert_eq!(stats.publish_errors, 2);
        assert!(!output.exists());
    }

    #[test]
    fn fatal_transport_error_stops_loop() {
        let temp = tempfile::tempdir().unwrap();
        let source = ScriptedSource::new(vec![
            Err(TransportError::Io(io::Error::from(io::ErrorKind::NotConnected))),
            datagram("12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME"),
        ]);
        let mut receiver = Receiver::new(
            source,
            SnapshotPublisher::new(temp.path().join("match-facts.json")),
        );

        let err = receiver.run().unwrap_err();

        assert!(matches!(err, TransportError::Io(_)));
        assert_eq!(receiver.stats().datagrams, 0);
        assert_eq!(receiver.source().events.len(), 1);
    }

    #[test]
    fn interrupted_receives_never_stop_loop() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("match-facts.json");
        let mut events: Vec<Event> = (0..MAX_CONSECUTIVE_TRANSPORT_ERRORS * 4)
            .map(|_| Err(TransportError::Io(io::Error::from(io::ErrorKind::Interrupted))))
            .collect();
        events.push(datagram("12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME"));
        let mut receiver =
            Receiver::new(ScriptedSource::new(events), SnapshotPublisher::new(&output));

        let stats = receiver.run().unwrap();

        assert_eq!(stats.published, 1);
        assert_eq!(
            stats.transport_errors,
            u64::from(MAX_CONSECUTIVE_TRANSPORT_ERRORS * 4)
        );
        assert!(output.exists());
    }

    #[test]
    fn repeated_unclassified_errors_stop_loop() {
        let temp = tempfile::tempdir().unwrap();
        let mut events: Vec<Event> = (0..MAX_CONSECUTIVE_TRANSPORT_ERRORS + 4)
            .map(|_| Err(TransportError::Io(io::Error::from(io::ErrorKind::ConnectionReset))))
            .collect();
        events.push(datagram("12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME"));
        let mut receiver = Receiver::new(
            ScriptedSource::new(events),
            SnapshotPublisher::new(temp.path().join("match-facts.json")),
        );

        assert!(receiver.run().is_err());
        assert_eq!(
            receiver.stats().transport_errors,
            u64::from(MAX_CONSECUTIVE_TRANSPORT_ERRORS)
        );
        assert_eq!(receiver.stats().published, 0);
    }

    #[test]
    fn successful_receive_resets_error_run() {
        let temp = tempfile::tempdir().unwrap();
        let reset = || TransportError::Io(io::Error::from(io::ErrorKind::ConnectionReset));
        let mut events: Vec<Event> = (1..MAX_CONSECUTIVE_TRANSPORT_ERRORS)
            .map(|_| Err(reset()))
            .collect();
        events.push(datagram("12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME"));
        events.extend((1..MAX_CONSECUTIVE_TRANSPORT_ERRORS).map(|_| Err(reset())));
        let mut receiver = Receiver::new(
            ScriptedSource::new(events),
            SnapshotPublisher::new(temp.path().join("match-facts.json")),
        );

        let stats = receiver.run().unwrap();

        assert_eq!(stats.published, 1);
    }
}
