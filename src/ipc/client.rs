//! IPC client used by the control CLI.

use std::path::Path;

use tokio::net::UnixStream;

use crate::error::{Error, Result};

use super::{read_frame, write_frame, Request, Response, CONNECT_TIMEOUT, OPERATION_TIMEOUT};

/// Send one request to the daemon at the default socket.
pub async fn send(request: &Request) -> Result<Response> {
    send_to(&super::socket_path(), request).await
}

/// Send one request to a specific socket path.
pub async fn send_to(socket: &Path, request: &Request) -> Result<Response> {
    let stream = tokio::time::timeout(CONNECT_TIMEOUT, UnixStream::connect(socket))
        .await
        .map_err(|_| Error::Timeout("ipc connect"))?
        .map_err(Error::Io)?;
    let mut stream = stream;

    write_frame(&mut stream, request).await?;
    tokio::time::timeout(OPERATION_TIMEOUT, read_frame(&mut stream))
        .await
        .map_err(|_| Error::Timeout("ipc response"))?
}
