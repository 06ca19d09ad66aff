use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, info, warn};

use crate::bridge::{DefaultOutputDeviceStream, MethodHandler, VolumeStream};
use crate::config::VolumeConfig;
use crate::error::{BridgeError, MethodError};
use crate::system::SoundOutputInterface;

/// Starts the default output device event stream.
pub const LISTEN_METHOD: &str = "listen";
/// Stops the default output device event stream.
pub const CANCEL_METHOD: &str = "cancel";
/// Starts the volume event stream.
pub const LISTEN_VOLUME_METHOD: &str = "listenVolume";
/// Stops the volume event stream.
pub const CANCEL_VOLUME_METHOD: &str = "cancelVolume";

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    args: Value,
}

/// One pushed event, written as `{"stream": ..., "event": ...}`.
#[derive(Debug, Serialize)]
#[serde(tag = "stream", content = "event", rename_all = "camelCase")]
enum StreamEvent {
    OutputDevice(String),
    Volume(f32),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outgoing {
    Success { id: Value, result: Value },
    Failure { id: Value, error: MethodError },
    Event(StreamEvent),
}

/// Serves method calls and the device and volume event streams as JSON lines.
///
/// Every response line is followed by any events the call produced, so a
/// `listen` with `emitOnStart` answers first and then pushes the current
/// device.
pub struct StdioService<S: SoundOutputInterface> {
    handler: MethodHandler<S>,
    stream: DefaultOutputDeviceStream<S>,
    volume_stream: VolumeStream<S>,
}

impl<S: SoundOutputInterface> StdioService<S> {
    pub fn new(sound_output: Arc<S>, settings: VolumeConfig) -> Self {
        Self {
            handler: MethodHandler::new(Arc::clone(&sound_output), settings),
            stream: DefaultOutputDeviceStream::new(Arc::clone(&sound_output)),
            volume_stream: VolumeStream::new(sound_output),
        }
    }

    /// Run until `reader` reaches end of input. Live listeners are cancelled
    /// before returning.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<StreamEvent>();
        let mut lines = LinesStream::new(reader.lines());

        info!("Bridge service ready");

        loop {
            tokio::select! {
                line = lines.next() => match line {
                    Some(line) => {
                        let line = line.context("Failed to read request line")?;
                        if line.trim().is_empty() {
                            continue;
                        }
                        let response = self.handle_line(&line, &event_tx);
                        write_message(&mut writer, &response).await?;
                        drain_events(&mut event_rx, &mut writer).await?;
                    }
                    None => break,
                },
                Some(event) = event_rx.recv() => {
                    write_message(&mut writer, &Outgoing::Event(event)).await?;
                }
            }
        }

        self.stream.on_cancel();
        self.volume_stream.on_cancel();
        drain_events(&mut event_rx, &mut writer).await?;
        info!("Input closed, bridge service stopped");
        Ok(())
    }

    fn handle_line(
        &mut self,
        line: &str,
        event_tx: &mpsc::UnboundedSender<StreamEvent>,
    ) -> Outgoing {
        // Parse in two steps so a request with a usable id but a bad shape is
        // still answered under that id.
        let request = serde_json::from_str::<Value>(line).map_err(|e| (Value::Null, e));
        let request = request.and_then(|value| {
            let id = value.get("id").cloned().unwrap_or(Value::Null);
            serde_json::from_value::<Request>(value).map_err(|e| (id, e))
        });
        let request = match request {
            Ok(request) => request,
            Err((id, e)) => {
                warn!("Malformed request line: {}", e);
                let error = BridgeError::InvalidArgument(format!("malformed request: {e}"));
                return Outgoing::Failure {
                    id,
                    error: error.into(),
                };
            }
        };

        debug!("Request {}: {}", request.id, request.method);

        let result = match request.method.as_str() {
            LISTEN_METHOD => {
                let tx = event_tx.clone();
                self.stream
                    .on_listen(&request.args, move |event: String| {
                        if tx.send(StreamEvent::OutputDevice(event)).is_err() {
                            debug!("Event receiver closed, dropping device change");
                        }
                    })
                    .map(|()| Value::Null)
            }
            CANCEL_METHOD => {
                self.stream.on_cancel();
                Ok(Value::Null)
            }
            LISTEN_VOLUME_METHOD => {
                let tx = event_tx.clone();
                self.volume_stream
                    .on_listen(&request.args, move |volume: f32| {
                        if tx.send(StreamEvent::Volume(volume)).is_err() {
                            debug!("Event receiver closed, dropping volume change");
                        }
                    })
                    .map(|()| Value::Null)
            }
            CANCEL_VOLUME_METHOD => {
                self.volume_stream.on_cancel();
                Ok(Value::Null)
            }
            method => self.handler.handle(method, &request.args),
        };

        match result {
            Ok(result) => Outgoing::Success {
                id: request.id,
                result,
            },
            Err(error) => Outgoing::Failure {
                id: request.id,
                error,
            },
        }
    }
}

async fn drain_events<W>(
    event_rx: &mut mpsc::UnboundedReceiver<StreamEvent>,
    writer: &mut W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Ok(event) = event_rx.try_recv() {
        write_message(writer, &Outgoing::Event(event)).await?;
    }
    Ok(())
}

async fn write_message<W>(writer: &mut W, message: &Outgoing) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(message).context("Failed to serialize response")?;
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .await
        .context("Failed to write response")?;
    writer.flush().await.context("Failed to flush response")?;
    Ok(())
}
