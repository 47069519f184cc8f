//! In-process transport
//!
//! A server registers a name with [`listen`] and serves the returned stream
//! with `tonic::transport::Server::serve_with_incoming`. Nodes whose address
//! is `in-process:<name>` then connect over an in-memory duplex pipe.

use std::io;
use std::pin::Pin;
use std::sync::LazyLock;
use std::task::{Context, Poll};

use dashmap::DashMap;
use futures::Stream;
use tokio::io::DuplexStream;
use tokio::sync::mpsc;
use tracing::debug;

const PIPE_BUFFER_SIZE: usize = 64 * 1024;

static LISTENERS: LazyLock<DashMap<String, mpsc::UnboundedSender<DuplexStream>>> =
    LazyLock::new(DashMap::new);

/// Incoming connections of one named in-process endpoint.
///
/// Dropping it unregisters the name.
pub struct InProcessIncoming {
    name: String,
    tx: mpsc::UnboundedSender<DuplexStream>,
    rx: mpsc::UnboundedReceiver<DuplexStream>,
}

impl InProcessIncoming {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Stream for InProcessIncoming {
    type Item = io::Result<DuplexStream>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx).map(|stream| stream.map(Ok))
    }
}

impl Drop for InProcessIncoming {
    fn drop(&mut self) {
        LISTENERS.remove_if(&self.name, |_, tx| tx.same_channel(&self.tx));
        debug!("In-process endpoint {} unregistered", self.name);
    }
}

/// Register `name` and return its incoming connection stream.
///
/// A later registration of the same name replaces the earlier one.
pub fn listen(name: impl Into<String>) -> InProcessIncoming {
    let name = name.into();
    let (tx, rx) = mpsc::unbounded_channel();
    LISTENERS.insert(name.clone(), tx.clone());
    debug!("In-process endpoint {} registered", name);
    InProcessIncoming { name, tx, rx }
}

pub fn is_listening(name: &str) -> bool {
    LISTENERS
        .get(name)
        .is_some_and(|tx| !tx.is_closed())
}

pub(crate) fn connect(name: &str) -> io::Result<DuplexStream> {
    let tx = LISTENERS
        .get(name)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotConnected,
                format!("no in-process endpoint named {}", name),
            )
        })?;

    let (client, server) = tokio::io::duplex(PIPE_BUFFER_SIZE);
    tx.send(server).map_err(|_| {
        io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("in-process endpoint {} is closed", name),
        )
    })?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    #[tokio::test]
    async fn test_connect_reaches_listener() {
        let mut incoming = listen("in-process-test-connect");
        assert!(is_listening("in-process-test-connect"));

        let mut client = connect("in-process-test-connect").unwrap();
        let mut server = incoming.next().await.unwrap().unwrap();

        client.write_all(b"ping").await.unwrap();
        let mut buf = [0u8; 4];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping");
    }

    #[tokio::test]
    async fn test_drop_unregisters() {
        let incoming = listen("in-process-test-drop");
        drop(incoming);
        assert!(!is_listening("in-process-test-drop"));
        assert_eq!(
            connect("in-process-test-drop").unwrap_err().kind(),
            io::ErrorKind::NotConnected
        );
    }

    #[tokio::test]
    async fn test_replaced_listener_keeps_newer_registration() {
        let first = listen("in-process-test-replace");
        let _second = listen("in-process-test-replace");
        drop(first);
        assert!(is_listening("in-process-test-replace"));
    }
}
