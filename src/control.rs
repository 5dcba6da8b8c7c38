//! Remote control via Unix socket
//!
//! A resident instance listens for line commands so a desktop shortcut can
//! start or dismiss a show without the window having focus:
//!
//! ```text
//! echo toggle | nc -U /tmp/deskburst.sock
//! ```

/// Commands that can be sent over the socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a show on every screen, or dismiss the running one
    Toggle,
    Quit,
}

impl Command {
    pub(crate) fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "toggle" | "t" => Some(Self::Toggle),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Quit => "quit",
        }
    }
}

#[cfg(unix)]
pub use socket::Controller;

#[cfg(unix)]
mod socket {
    use std::io::{BufRead, BufReader, ErrorKind, Write};
    use std::os::unix::net::{UnixListener, UnixStream};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::thread;
    use std::time::Duration;

    use log::{debug, warn};

    use super::Command;
    use crate::error::{DeskburstError, Result};

    const SOCKET_PATH: &str = "/tmp/deskburst.sock";

    /// Controller that listens for commands on a Unix socket
    pub struct Controller {
        receiver: Receiver<Command>,
        _listener_thread: thread::JoinHandle<()>,
    }

    impl Controller {
        /// Create a new controller listening on the Unix socket
        pub fn new() -> Result<Self> {
            // Remove a stale socket from a previous run
            let _ = std::fs::remove_file(SOCKET_PATH);

            let listener = UnixListener::bind(SOCKET_PATH)
                .map_err(|e| DeskburstError::Control(format!("failed to bind {}: {}", SOCKET_PATH, e)))?;
            listener.set_nonblocking(true)?;

            let (sender, receiver) = mpsc::channel();
            let handle = thread::spawn(move || {
                Self::listener_loop(&listener, &sender);
            });

            debug!("listening for commands on {}", SOCKET_PATH);
            Ok(Self {
                receiver,
                _listener_thread: handle,
            })
        }

        fn listener_loop(listener: &UnixListener, sender: &Sender<Command>) {
            loop {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let sender = sender.clone();
                        thread::spawn(move || {
                            Self::handle_client(stream, &sender);
                        });
                    },
                    Err(e) if e.kind() == ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(50));
                    },
                    Err(e) => {
                        warn!("control socket closed: {}", e);
                        break;
                    },
                }
            }
        }

        fn handle_client(stream: UnixStream, sender: &Sender<Command>) {
            // Accepted sockets inherit non-blocking mode on some platforms
            if let Err(e) = stream.set_nonblocking(false) {
                warn!("control client: {}", e);
                return;
            }
            let reader = BufReader::new(stream);
            for line in reader.lines().map_while(std::result::Result::ok) {
                match Command::parse(&line) {
                    Some(cmd) => {
                        if sender.send(cmd).is_err() {
                            break;
                        }
                    },
                    None => warn!("ignoring unknown control command {:?}", line.trim()),
                }
            }
        }

        /// Get any pending commands (non-blocking)
        pub fn poll(&self) -> Vec<Command> {
            self.receiver.try_iter().collect()
        }

        /// Send a command to a resident instance
        pub fn send(command: Command) -> Result<()> {
            let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
                DeskburstError::Control(format!(
                    "no resident instance at {} ({}); start one with --resident",
                    SOCKET_PATH, e
                ))
            })?;
            writeln!(stream, "{}", command.as_str())?;
            Ok(())
        }

        /// Get the socket path
        pub fn socket_path() -> &'static str {
            SOCKET_PATH
        }
    }

    impl Drop for Controller {
        fn drop(&mut self) {
            // Clean up the socket file
            let _ = std::fs::remove_file(SOCKET_PATH);
        }
    }
}
