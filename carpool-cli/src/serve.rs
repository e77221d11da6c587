//! Serve command: configuration and the HTTP accept loop.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use carpool_core::Pool;
use clap::Parser;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode, header};
use hyper_util::rt::TokioIo;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tokio::net::{TcpListener, TcpStream};

use crate::http::{ApiRequest, ApiResponse, route};
use crate::{ARG_BIND, ARG_PORT, CliError, DEFAULT_BIND, DEFAULT_PORT};

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Serve the car-pooling API over HTTP/1.1. The bind address \
                 and port can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Serve the car-pooling HTTP API"
)]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct ServeArgs {
    /// IP address to listen on.
    #[arg(long = ARG_BIND, value_name = "addr")]
    #[serde(default)]
    pub(crate) bind: Option<String>,
    /// TCP port to listen on.
    #[arg(long = ARG_PORT, value_name = "port")]
    #[serde(default)]
    pub(crate) port: Option<u16>,
}

impl ServeArgs {
    pub(crate) fn into_config(self) -> Result<ServeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServeConfig::try_from(merged)
    }
}

/// Resolved `serve` command configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ServeConfig {
    pub(crate) bind: IpAddr,
    pub(crate) port: u16,
}

impl ServeConfig {
    pub(crate) const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl TryFrom<ServeArgs> for ServeConfig {
    type Error = CliError;

    fn try_from(args: ServeArgs) -> Result<Self, Self::Error> {
        let raw_bind = args.bind.unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind = raw_bind
            .trim()
            .parse()
            .map_err(|source| CliError::InvalidBindAddress {
                field: ARG_BIND,
                value: raw_bind.clone(),
                source,
            })?;
        Ok(Self {
            bind,
            port: args.port.unwrap_or(DEFAULT_PORT),
        })
    }
}

pub(crate) fn run_serve(config: &ServeConfig) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(async {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| CliError::Bind { addr, source })?;
        info!("listening on {addr}");
        serve(listener, Arc::new(Pool::new()), tokio::signal::ctrl_c())
            .await
            .map_err(|source| CliError::Serve { addr, source })
    })
}

/// Largest request body the server reads; bigger bodies get 413.
pub(crate) const MAX_BODY_BYTES: usize = 64 * 1024;

/// Accept connections until `shutdown` resolves.
pub(crate) async fn serve<F>(
    listener: TcpListener,
    pool: Arc<Pool>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let pool = Arc::clone(&pool);
                    tokio::spawn(async move {
                        if let Err(err) = serve_connection(stream, pool).await {
                            warn!("connection from {peer} failed: {err}");
                        }
                    });
                }
                Err(err) => warn!("accept failed: {err}"),
            },
            signal = &mut shutdown => {
                signal?;
                info!("shutting down");
                return Ok(());
            }
        }
    }
}

async fn serve_connection(stream: TcpStream, pool: Arc<Pool>) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let pool = Arc::clone(&pool);
        async move { Ok::<_, Infallible>(handle_request(req, &pool).await) }
    });
    http1::Builder::new().serve_connection(io, service).await
}

pub(crate) async fn handle_request<B>(req: Request<B>, pool: &Pool) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let response = match read_body(body).await {
        Ok(bytes) => {
            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok());
            route(
                pool,
                &ApiRequest {
                    method: &parts.method,
                    path: parts.uri.path(),
                    content_type,
                    body: &bytes,
                },
            )
        }
        Err(status) => ApiResponse::empty(status),
    };
    info!(
        "{} {} -> {}",
        parts.method,
        parts.uri.path(),
        response.status.as_u16()
    );
    into_hyper(response)
}

/// Collect at most [`MAX_BODY_BYTES`] of `body`.
///
/// A declared length over the cap is refused before any byte is read.
async fn read_body<B>(body: B) -> Result<Bytes, StatusCode>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let declared = body.size_hint().lower();
    if usize::try_from(declared).map_or(true, |len| len > MAX_BODY_BYTES) {
        warn!("refusing request body of {declared} bytes");
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => {
            warn!("request body exceeds {MAX_BODY_BYTES} bytes");
            Err(StatusCode::PAYLOAD_TOO_LARGE)
        }
        Err(err) => {
            warn!("failed to read request body: {err}");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

fn into_hyper(response: ApiResponse) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(response.status);
    let body = match response.body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Full::new(Bytes::from(json))
        }
        None => Full::new(Bytes::new()),
    };
    builder.body(body).unwrap_or_else(|_| {
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}
