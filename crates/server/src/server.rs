use {
    crate::{ServerError, connection},
    detect::Detector,
    std::{net::SocketAddr, sync::Arc},
    tokio::{
        net::{TcpListener, ToSocketAddrs},
        task::JoinHandle,
    },
    tokio_websockets::ServerBuilder,
};

pub struct Server {
    local_addr: SocketAddr,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Bind a TCP listener and start accepting WebSocket clients.
    ///
    /// A background task accepts connections, performs the WebSocket
    /// handshake, and spawns one connection task per client. Session state
    /// is owned by that task, so concurrent clients stream independently.
    pub async fn bind(
        addr: impl ToSocketAddrs,
        detector: Arc<dyn Detector>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let accept_task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((tcp_stream, addr)) => {
                        let detector = Arc::clone(&detector);
                        tokio::spawn(async move {
                            match ServerBuilder::new().accept(tcp_stream).await {
                                Ok((_request, ws_stream)) => {
                                    log::info!("client {addr}: connected");
                                    connection::handle(ws_stream, addr, detector).await;
                                }
                                Err(e) => {
                                    log::warn!("WebSocket handshake failed for {addr}: {e}");
                                }
                            }
                        });
                    }
                    Err(e) => {
                        log::warn!("accept error: {e}");
                        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    }
                }
            }
        });

        Ok(Self {
            local_addr,
            accept_task,
        })
    }

    /// Return the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}
