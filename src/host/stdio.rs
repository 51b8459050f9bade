//! Stdin/stdout JSON bridge for the search controller.
//!
//! Reads newline-delimited JSON `CommandEnvelope` messages, dispatches them
//! through a [`CommandHandler`], and writes `ResponseEnvelope` and
//! `EventEnvelope` messages as newline-delimited JSON.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use crate::controller::{PageWindow, SearchController, SearchState};
use crate::error::{Result, SiftError};
use crate::host::contract::{
    CommandEnvelope, CommandName, EventEnvelope, ResponseEnvelope, STATE_CHANGED_EVENT,
};
use crate::host::handler::{CommandHandler, StateView};
use sift_client::SearchBackend;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{Mutex, oneshot, watch};

/// Run the bridge over the process's stdin and stdout.
///
/// # Errors
///
/// See [`run_bridge`].
pub async fn run_stdio_bridge<B: SearchBackend + 'static>(
    controller: SearchController<B>,
) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = BufWriter::new(tokio::io::stdout());
    run_bridge(controller, reader, writer).await
}

/// Run the bridge until `reader` reaches EOF or a `host.stop` command is
/// received.
///
/// Two tasks operate concurrently:
///
/// 1. **Reader** -- reads command lines, dispatches each through the
///    handler, and writes the response.
/// 2. **State forwarder** -- watches the controller and writes a
///    `state.changed` event for each published state.
///
/// On shutdown every started action is awaited, then the forwarder writes
/// the final state (if not yet written) and exits, so the last event always
/// reflects where the controller settled.
///
/// # Errors
///
/// Returns [`SiftError::Bridge`] if reading or writing the streams fails.
pub async fn run_bridge<B, R, W>(controller: SearchController<B>, reader: R, writer: W) -> Result<()>
where
    B: SearchBackend + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer = Arc::new(Mutex::new(writer));
    let window = controller.config().page_window;

    let (stop_tx, stop_rx) = oneshot::channel();
    let forwarder = tokio::spawn(forward_state(
        controller.subscribe(),
        window,
        Arc::clone(&writer),
        stop_rx,
    ));

    let mut handler = CommandHandler::new(controller);
    let reader_result = run_reader(&mut handler, reader, &writer).await;

    handler.drain().await;
    let _ = stop_tx.send(());
    match forwarder.await {
        Ok(Err(e)) => tracing::warn!(error = %e, "state forwarder stopped with error"),
        Err(e) => tracing::error!(error = %e, "state forwarder task failed"),
        Ok(Ok(())) => {}
    }

    reader_result
}

/// Read command lines, dispatch each command, and write responses.
async fn run_reader<B, R, W>(
    handler: &mut CommandHandler<B>,
    mut reader: R,
    writer: &Mutex<W>,
) -> Result<()>
where
    B: SearchBackend + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| SiftError::Bridge(format!("failed to read command: {e}")))?;

        // EOF
        if bytes_read == 0 {
            tracing::info!("input closed (EOF); shutting down bridge");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let envelope: CommandEnvelope = match serde_json::from_str(trimmed) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse command envelope");
                let response = ResponseEnvelope::error(
                    "parse-error",
                    format!("failed to parse command envelope: {e}"),
                );
                write_json(writer, &response).await?;
                continue;
            }
        };

        let is_stop = envelope.command == CommandName::HostStop;
        let response = handler.handle(&envelope).await;
        write_json(writer, &response).await?;

        if is_stop {
            tracing::info!("host.stop received; shutting down bridge");
            break;
        }
    }

    Ok(())
}

/// Write a `state.changed` event for each published state until `stop`
/// fires or the controller is dropped.
async fn forward_state<W>(
    mut states: watch::Receiver<SearchState>,
    window: PageWindow,
    writer: Arc<Mutex<W>>,
    mut stop: oneshot::Receiver<()>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    tracing::info!("controller dropped; stopping state forwarder");
                    return Ok(());
                }
                let state = states.borrow_and_update().clone();
                write_state(&writer, state, window).await?;
            }
            _ = &mut stop => {
                if states.has_changed().unwrap_or(false) {
                    let state = states.borrow_and_update().clone();
                    write_state(&writer, state, window).await?;
                }
                return Ok(());
            }
        }
    }
}

async fn write_state<W: AsyncWrite + Unpin>(
    writer: &Mutex<W>,
    state: SearchState,
    window: PageWindow,
) -> Result<()> {
    let payload = serde_json::to_value(StateView::new(state, window))?;
    write_json(writer, &EventEnvelope::new(STATE_CHANGED_EVENT, payload)).await
}

async fn write_json<W, T>(writer: &Mutex<W>, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let json = serde_json::to_string(message)?;
    let mut w = writer.lock().await;
    write_line(&mut *w, &json).await
}

/// Write a single JSON line and flush.
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> Result<()> {
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| SiftError::Bridge(format!("failed to write output: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| SiftError::Bridge(format!("failed to write newline: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| SiftError::Bridge(format!("failed to flush output: {e}")))?;
    Ok(())
}
