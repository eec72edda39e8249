// ABOUTME: API server accept loop over Unix or TCP listeners.
// ABOUTME: Serves the router with one hyper http1 connection task per client.

use crate::config::ListenConfig;
use crate::error::{Error, Result};
use axum::Router;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};
use tower::Service;

/// Docker-compatible API server.
pub struct ApiServer {
    listen: ListenConfig,
    app: Router,
}

impl ApiServer {
    pub fn new(listen: ListenConfig, app: Router) -> Self {
        Self { listen, app }
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// In-flight connections are left to finish on their own tasks; a
    /// client blocked in `wait` is not interrupted by shutdown.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        match &self.listen {
            ListenConfig::Socket(path) => {
                let listener = bind_unix(path)?;
                tracing::info!("API server listening on {}", self.listen);
                let result = serve_until(accept_unix(&listener, &self.app), shutdown).await;
                let _ = std::fs::remove_file(path);
                result
            }
            ListenConfig::Tcp(addr) => {
                let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
                    address: self.listen.to_string(),
                    source,
                })?;
                tracing::info!("API server listening on {}", self.listen);
                serve_until(accept_tcp(&listener, &self.app), shutdown).await
            }
        }
    }
}

async fn serve_until<A, F>(accept: A, shutdown: F) -> Result<()>
where
    A: Future<Output = std::io::Result<()>>,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = accept => result.map_err(Error::from),
        () = shutdown => {
            tracing::info!("shutting down API server");
            Ok(())
        }
    }
}

async fn accept_unix(listener: &UnixListener, app: &Router) -> std::io::Result<()> {
    loop {
        let (stream, _) = listener.accept().await?;
        spawn_connection(stream, app.clone());
    }
}

async fn accept_tcp(listener: &TcpListener, app: &Router) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::debug!(%peer, "accepted connection");
        spawn_connection(stream, app.clone());
    }
}

fn bind_unix(path: &Path) -> Result<UnixListener> {
    // Remove a stale socket left by a previous run.
    let _ = std::fs::remove_file(path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    UnixListener::bind(path).map_err(|source| Error::Bind {
        address: format!("unix://{}", path.display()),
        source,
    })
}

fn spawn_connection<S>(stream: S, app: Router)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let hyper_service = hyper::service::service_fn(move |request: hyper::Request<Incoming>| {
            app.clone().call(request)
        });

        if let Err(err) = http1::Builder::new()
            .serve_connection(TokioIo::new(stream), hyper_service)
            .await
            && !is_disconnect_error(&err)
        {
            tracing::error!("error serving connection: {}", err);
        }
    });
}

fn is_disconnect_error(err: &hyper::Error) -> bool {
    if err.is_incomplete_message() || err.is_canceled() {
        return true;
    }
    let msg = err.to_string().to_lowercase();
    msg.contains("broken pipe") || msg.contains("connection reset")
}
