use std::net::{SocketAddr, UdpSocket};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use super::{Datagram, DatagramSource, TransportError};

/// Broadcast-capable UDP socket feeding the receive loop.
pub struct UdpDatagramSource {
    socket: UdpSocket,
    buffer: Vec<u8>,
}

impl UdpDatagramSource {
    /// Open, configure (address reuse, broadcast) and bind the socket.
    ///
    /// Datagrams longer than `buffer_len` are truncated by the transport.
    pub fn bind(addr: SocketAddr, buffer_len: usize) -> Result<Self, TransportError> {
        let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.set_broadcast(true)?;
        socket.bind(&SockAddr::from(addr))?;
        Ok(Self {
            socket: socket.into(),
            buffer: vec![0u8; buffer_len.max(1)],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }
}

impl DatagramSource for UdpDatagramSource {
    fn recv_datagram(&mut self) -> Result<Datagram, TransportError> {
        let (len, peer) = self.socket.recv_from(&mut self.buffer)?;
        Ok(Datagram::new(&self.buffer[..len], Some(peer)))
    }
}
