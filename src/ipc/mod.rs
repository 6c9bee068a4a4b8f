//! IPC wire format
//!
//! Length-delimited JSON over a local Unix socket: a 4-byte big-endian
//! frame length followed by one JSON document. The CLI sends one
//! `Request` per connection and reads one `Response`.

pub mod client;
pub mod server;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

/// Frames larger than this are rejected as malformed.
const MAX_FRAME_LEN: u32 = 1024 * 1024;

/// Read deadline for a request on an accepted connection.
pub const READ_DEADLINE: std::time::Duration = std::time::Duration::from_secs(30);
/// Client connect timeout.
pub const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);
/// Default end-to-end operation timeout on the client side.
pub const OPERATION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// A control request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

impl Request {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: None,
            args: None,
        }
    }

    pub fn with_args(action: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            action: action.into(),
            params: None,
            args: Some(args),
        }
    }
}

/// Standard response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERR_UNKNOWN_COMMAND")]
    UnknownCommand,
    #[serde(rename = "ERR_NOT_RUNNING")]
    NotRunning,
    #[serde(rename = "ERR_ALREADY_RUNNING")]
    AlreadyRunning,
    #[serde(rename = "ERR_MODE_DISABLED")]
    ModeDisabled,
    #[serde(rename = "ERR_INVALID_INPUT")]
    InvalidInput,
    #[serde(rename = "ERR_ACTION_FAILED")]
    ActionFailed,
}

impl ResponseCode {
    /// Wire name, also used for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::UnknownCommand => "ERR_UNKNOWN_COMMAND",
            Self::NotRunning => "ERR_NOT_RUNNING",
            Self::AlreadyRunning => "ERR_ALREADY_RUNNING",
            Self::ModeDisabled => "ERR_MODE_DISABLED",
            Self::InvalidInput => "ERR_INVALID_INPUT",
            Self::ActionFailed => "ERR_ACTION_FAILED",
        }
    }
}

/// A control response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ResponseCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            code: Some(ResponseCode::Ok),
            data: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok()
        }
    }

    pub fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok()
        }
    }

    pub fn error(code: ResponseCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            code: Some(code),
            data: None,
        }
    }
}

/// Default socket location in the user's runtime directory.
pub fn socket_path() -> PathBuf {
    let runtime_dir = dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    runtime_dir.join("neru.sock")
}

/// Write one length-delimited JSON frame.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload =
        serde_json::to_vec(value).map_err(|e| Error::InvalidInput(format!("encode: {e}")))?;
    let len = u32::try_from(payload.len())
        .map_err(|_| Error::InvalidInput("frame too large".to_string()))?;
    if len > MAX_FRAME_LEN {
        return Err(Error::InvalidInput("frame too large".to_string()));
    }
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-delimited JSON frame.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes);
    if len > MAX_FRAME_LEN {
        return Err(Error::InvalidInput(format!("oversized frame: {len} bytes")));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    serde_json::from_slice(&payload).map_err(|e| Error::InvalidInput(format!("decode: {e}")))
}
