use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{sync::oneshot, task::JoinHandle};

use crate::{
    Error, Res,
    api::{self, CallbackState},
    warning,
};

/// Local listener receiving the authorization redirect.
pub struct CallbackServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl CallbackServer {
    /// Binds `addr` and starts serving `/callback` and `/health` in the background.
    pub async fn start(addr: &str, state: CallbackState) -> Res<Self> {
        let app = Router::new()
            .route("/health", get(api::health))
            .route("/callback", get(api::callback))
            .layer(Extension(Arc::new(state)));

        let addr = SocketAddr::from_str(addr)
            .map_err(|e| Error::Config(format!("Failed to parse server address {}: {}", addr, e)))?;

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::debug!(%local_addr, "callback server listening");

        let (shutdown, signal) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        Ok(Self {
            local_addr,
            shutdown,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for in-flight responses.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        match self.handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warning!("Callback server stopped with an error: {}", e),
            Err(e) => warning!("Callback server task failed: {}", e),
        }
    }
}
