//! JSON-lines session: requests in, responses and events out.

use multiview_common::WebviewError;
use multiview_webview::protocol::{self, Response};
use multiview_webview::{CreateOptions, WebviewClient, WebviewEvent};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, mpsc};

/// Serve requests from `input` until it ends.
///
/// Requests are dispatched one at a time, in the order they were read.
/// Events are forwarded to `output` as they are published, interleaved with
/// responses. After end of input the client is dropped, which stops the
/// service; the session returns once the service's last events are written.
pub async fn serve<R, W>(
    client: WebviewClient,
    defaults: CreateOptions,
    events: broadcast::Receiver<WebviewEvent>,
    input: R,
    output: W,
) -> std::io::Result<W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(write_lines(out_rx, output));
    let forwarder = tokio::spawn(forward_events(events, out_tx.clone()));

    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match protocol::parse_request(line) {
            Ok(request) => {
                tracing::debug!(method = %request.method, "request");
                protocol::dispatch(&client, &defaults, request).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed request line");
                Response::failure(
                    serde_json::Value::Null,
                    &WebviewError::InvalidArgument(format!("malformed request: {e}")),
                )
            }
        };
        send_json(&out_tx, &response);
    }

    tracing::info!("input closed, shutting down");
    drop(client);
    drop(out_tx);
    if let Err(e) = forwarder.await {
        tracing::warn!(error = %e, "event forwarder failed");
    }
    writer
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
}

async fn forward_events(
    mut events: broadcast::Receiver<WebviewEvent>,
    out: mpsc::UnboundedSender<String>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if !send_json(&out, &event) {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "event output lagging, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn write_lines<W>(mut rx: mpsc::UnboundedReceiver<String>, mut output: W) -> std::io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(output)
}

/// Queue one JSON line. Returns false once the writer is gone.
fn send_json<T: serde::Serialize>(out: &mpsc::UnboundedSender<String>, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(line) => out.send(line).is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize output");
            true
        }
    }
}
