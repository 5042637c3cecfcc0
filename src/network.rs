use screenpad_core::KeyPad;
use std::io;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const RECEIVE_BUFFER_SIZE: usize = 1024;
pub const DEFAULT_SCREEN_GROUP: Ipv4Addr = Ipv4Addr::new(230, 0, 0, 0);
pub const DEFAULT_SCREEN_PORT: u16 = 9999;
pub const DEFAULT_KEYPAD_GROUP: Ipv4Addr = Ipv4Addr::new(230, 0, 0, 0);
pub const DEFAULT_KEYPAD_PORT: u16 = 9998;

/// How long a blocked receive waits before checking whether it should stop.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Receives the emulator's peripheral broadcasts.
pub struct MulticastListener {
    socket: UdpSocket,
    running: Arc<AtomicBool>,
}

/// Stops a [MulticastListener] from another thread.
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    running: Arc<AtomicBool>,
}

impl ListenerHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

impl MulticastListener {
    pub fn join(group: Ipv4Addr, port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port))?;
        socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
        log::info!("Joined multicast group {}:{}", group, port);

        Self::from_socket(socket)
    }

    /// Listen on an already bound socket, unicast or multicast.
    pub fn from_socket(socket: UdpSocket) -> io::Result<Self> {
        socket.set_read_timeout(Some(POLL_INTERVAL))?;

        Ok(MulticastListener {
            socket,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.socket.local_addr()
    }

    pub fn stop_handle(&self) -> ListenerHandle {
        ListenerHandle {
            running: self.running.clone(),
        }
    }

    /// Blocks, handing every datagram to `handler` until the listener is stopped.
    ///
    /// Datagrams longer than [RECEIVE_BUFFER_SIZE] are truncated.
    pub fn run(&self, mut handler: impl FnMut(&[u8])) {
        let mut buffer = [0u8; RECEIVE_BUFFER_SIZE];

        while self.running.load(Ordering::Acquire) {
            match self.socket.recv_from(&mut buffer) {
                Ok((length, source)) => {
                    log::trace!("Received {} bytes from {}", length, source);
                    handler(&buffer[..length]);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {}
                Err(e) => log::warn!("Failed to receive datagram: {}", e),
            }
        }
    }
}

/// Sends the keypad state back to the emulator.
pub struct KeyStateAnnouncer {
    socket: UdpSocket,
    target: SocketAddrV4,
}

impl KeyStateAnnouncer {
    pub fn new(group: Ipv4Addr, port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0))?;

        Ok(KeyStateAnnouncer {
            socket,
            target: SocketAddrV4::new(group, port),
        })
    }

    pub fn target(&self) -> SocketAddrV4 {
        self.target
    }

    pub fn announce(&self, keypad: &KeyPad) -> io::Result<()> {
        self.socket.send_to(&keypad.to_datagram(), self.target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use screenpad_core::KeyFlags;
    use std::thread;

    #[test]
    fn listener_hands_datagrams_to_handler() {
        let listener = MulticastListener::from_socket(UdpSocket::bind("127.0.0.1:0").unwrap()).unwrap();
        let address = listener.local_addr().unwrap();
        let handle = listener.stop_handle();

        let receiver = thread::spawn(move || {
            let mut received = Vec::new();
            listener.run(|payload| {
                received.push(payload.to_vec());
                handle.stop();
            });
            received
        });

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(&[1, 2, 3], address).unwrap();

        assert_eq!(receiver.join().unwrap(), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn stopped_listener_returns() {
        let listener = MulticastListener::from_socket(UdpSocket::bind("127.0.0.1:0").unwrap()).unwrap();
        listener.stop_handle().stop();

        let mut calls = 0;
        listener.run(|_| calls += 1);

        assert_eq!(calls, 0);
    }

    #[test]
    fn oversized_datagrams_are_truncated() {
        let listener = MulticastListener::from_socket(UdpSocket::bind("127.0.0.1:0").unwrap()).unwrap();
        let address = listener.local_addr().unwrap();
        let handle = listener.stop_handle();

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(&[7u8; RECEIVE_BUFFER_SIZE + 100], address).unwrap();

        let mut length = 0;
        listener.run(|payload| {
            length = payload.len();
            handle.stop();
        });

        assert_eq!(length, RECEIVE_BUFFER_SIZE);
    }

    #[test]
    fn announcer_sends_big_endian_key_state() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let port = receiver.local_addr().unwrap().port();

        let announcer = KeyStateAnnouncer::new(Ipv4Addr::LOCALHOST, port).unwrap();
        let mut keypad = KeyPad::new();
        keypad.press(KeyFlags::KEY_0);
        keypad.press(KeyFlags::KEY_F);
        announcer.announce(&keypad).unwrap();

        let mut buffer = [0u8; 16];
        let (length, _) = receiver.recv_from(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], &[0x80, 0x01]);
    }
}
