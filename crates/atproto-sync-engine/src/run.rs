//! The connection loop: connect, hand frames to the adapter, reconnect.

use std::sync::Arc;

use atproto_sync_core::{
    DisconnectReason, EngineConfig, Frame, FlowCredit, InitError, OutboundFrame, OutboundSender, StreamAdapter,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, OwnedSemaphorePermit};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::state::ConnectionState;
use crate::tls_connector::build_connector;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

const OUTBOUND_CHANNEL_CAPACITY: usize = 32;

pub(crate) async fn run<A: StreamAdapter>(
    adapter: Arc<A>,
    config: EngineConfig,
    mut user_data: A::UserData,
    mut shutdown_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<ConnectionState>,
    failure_tx: watch::Sender<Option<InitError>>,
) {
    let mut attempt: u32 = 0;

    loop {
        if *shutdown_rx.borrow() {
            return;
        }

        let path = adapter.build_path(&user_data);
        let headers = adapter.extra_headers(&user_data);
        match connect(&config, &path, &headers, &state_tx).await {
            Ok((ws_stream, outbound_tx, outbound_rx)) => {
                attempt = 0;
                state_tx.send_replace(ConnectionState::Connected);
                let outbound = OutboundSender::new(outbound_tx);
                let flow_credit = FlowCredit::new(config.flow_credit_count());
                user_data = adapter.on_connected(user_data, outbound).await;

                let (reason, returned_data) =
                    ingress_loop(adapter.as_ref(), ws_stream, outbound_rx, user_data, &mut shutdown_rx, &flow_credit).await;
                info!(?reason, "connection ended");
                user_data = adapter.on_disconnected(reason.clone(), returned_data).await;
                state_tx.send_replace(ConnectionState::Disconnected);

                if matches!(reason, DisconnectReason::Stopped) {
                    return;
                }
            }
            Err(ConnectFailure::Transient(reason)) => {
                warn!(?reason, "connection attempt failed");
                user_data = adapter.on_disconnected(reason, user_data).await;
                state_tx.send_replace(ConnectionState::Disconnected);
            }
            Err(ConnectFailure::Fatal(err)) => {
                warn!(error = %err, "transport could not be opened; stopping instead of reconnecting");
                failure_tx.send_replace(Some(err));
                state_tx.send_replace(ConnectionState::Failed);
                return;
            }
        }

        if *shutdown_rx.borrow() {
            return;
        }

        let delay = config.reconnect_strategy().delay_for(attempt);
        attempt = attempt.saturating_add(1);
        debug!(?delay, attempt, "waiting before reconnect");
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    return;
                }
            }
        }
    }
}

/// Outcome of a failed [`connect`] attempt.
///
/// A transient failure (timeout, rejected upgrade, a dropped handshake) is
/// handed to the adapter's `on_disconnected` and retried on the usual
/// backoff schedule. A fatal one means the transport itself could never be
/// opened — a host that doesn't resolve, a refused connection — and no
/// amount of retrying changes that, so it stops the engine instead.
enum ConnectFailure {
    Transient(DisconnectReason),
    Fatal(InitError),
}

/// Turns `url` plus an adapter's extra headers into an upgrade request.
/// Most adapters pass no headers, in which case this is equivalent to
/// handing `url` straight to `client_async_tls_with_config`.
fn build_request(
    url: &str,
    headers: &[(String, String)],
) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request, DisconnectReason> {
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;

    let mut request = url
        .into_client_request()
        .map_err(|err| DisconnectReason::TransportError { message: err.to_string() })?;

    for (name, value) in headers {
        let name = tokio_tungstenite::tungstenite::http::header::HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| DisconnectReason::TransportError { message: err.to_string() })?;
        let value = tokio_tungstenite::tungstenite::http::header::HeaderValue::from_str(value)
            .map_err(|err| DisconnectReason::TransportError { message: err.to_string() })?;
        request.headers_mut().insert(name, value);
    }

    Ok(request)
}

/// Opens the TCP/TLS socket (`ConnectingHttp`) and then performs the
/// WebSocket upgrade (`ConnectingWs`), each under its own timeout.
async fn connect(
    config: &EngineConfig,
    path: &str,
    headers: &[(String, String)],
    state_tx: &watch::Sender<ConnectionState>,
) -> Result<(WsStream, mpsc::Sender<OutboundFrame>, mpsc::Receiver<OutboundFrame>), ConnectFailure> {
    state_tx.send_replace(ConnectionState::ConnectingHttp);

    let host = config
        .host()
        .host_str()
        .ok_or_else(|| ConnectFailure::Fatal(InitError::ConnectFailed("host URL has no host component".into())))?;
    let port = config.host().port_or_known_default().ok_or_else(|| {
        ConnectFailure::Fatal(InitError::ConnectFailed("host URL scheme has no default port".into()))
    })?;

    let tcp = match tokio::time::timeout(config.connect_timeout(), TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(err)) => return Err(ConnectFailure::Fatal(InitError::ConnectFailed(err.to_string()))),
        Err(_) => return Err(ConnectFailure::Transient(DisconnectReason::ConnectTimeout)),
    };

    state_tx.send_replace(ConnectionState::ConnectingWs);

    let url = format!("{}{}", config.host().as_str().trim_end_matches('/'), path);
    let request = build_request(&url, headers).map_err(ConnectFailure::Transient)?;
    let connector = build_connector(config.tls_options());
    let upgrade = tokio_tungstenite::client_async_tls_with_config(request, tcp, None, connector);

    let (ws_stream, _response) = match tokio::time::timeout(config.connect_timeout(), upgrade).await {
        Ok(Ok(pair)) => pair,
        Ok(Err(tokio_tungstenite::tungstenite::Error::Http(response))) => {
            return Err(ConnectFailure::Transient(DisconnectReason::UpgradeRejected {
                status: response.status().as_u16(),
            }));
        }
        Ok(Err(err)) => return Err(ConnectFailure::Transient(DisconnectReason::TransportError { message: err.to_string() })),
        Err(_) => return Err(ConnectFailure::Transient(DisconnectReason::UpgradeTimeout)),
    };

    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CHANNEL_CAPACITY);
    Ok((ws_stream, outbound_tx, outbound_rx))
}

/// Drives one live connection: forwards inbound frames to the adapter and
/// inbound-from-adapter frames (acks, filter updates) out to the socket.
async fn ingress_loop<A: StreamAdapter>(
    adapter: &A,
    ws_stream: WsStream,
    mut outbound_rx: mpsc::Receiver<OutboundFrame>,
    mut user_data: A::UserData,
    shutdown_rx: &mut watch::Receiver<bool>,
    flow_credit: &FlowCredit,
) -> (DisconnectReason, A::UserData) {
    let (mut ws_tx, mut ws_rx): (WsSink, WsSource) = ws_stream.split();

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    let _ = ws_tx.close().await;
                    return (DisconnectReason::Stopped, user_data);
                }
            }

            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(OutboundFrame::Text(text)) => {
                        if let Err(err) = ws_tx.send(Message::Text(text.into())).await {
                            warn!(error = %err, "failed to send outbound frame");
                        }
                    }
                    Some(OutboundFrame::Binary(data)) => {
                        if let Err(err) = ws_tx.send(Message::Binary(data.into())).await {
                            warn!(error = %err, "failed to send outbound frame");
                        }
                    }
                    None => {
                        // Adapter dropped its outbound sender; nothing left to forward.
                    }
                }
            }

            (permit, message) = next_frame(flow_credit, &mut ws_rx) => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        user_data = apply_frame(adapter, Frame::Text(text.to_string()), permit, user_data).await;
                    }
                    Some(Ok(Message::Binary(data))) => {
                        user_data = apply_frame(adapter, Frame::Binary(data.into()), permit, user_data).await;
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        drop(permit);
                        let _ = ws_tx.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Pong(_))) => {
                        drop(permit);
                    }
                    Some(Ok(Message::Close(frame))) => {
                        drop(permit);
                        return (close_reason(frame), user_data);
                    }
                    Some(Ok(Message::Frame(_))) => {
                        drop(permit);
                    }
                    Some(Err(err)) => {
                        drop(permit);
                        return (DisconnectReason::TransportError { message: err.to_string() }, user_data);
                    }
                    None => {
                        drop(permit);
                        return (
                            DisconnectReason::TransportError { message: "stream ended without a close frame".into() },
                            user_data,
                        );
                    }
                }
            }
        }
    }
}

/// Acquires flow credit before polling for the next frame, so a consumer
/// that's still working through earlier events backs up ingress itself
/// rather than piling frames up unboundedly.
async fn next_frame(
    flow_credit: &FlowCredit,
    ws_rx: &mut WsSource,
) -> (OwnedSemaphorePermit, Option<Result<Message, tokio_tungstenite::tungstenite::Error>>) {
    let permit = flow_credit.acquire().await;
    let message = ws_rx.next().await;
    (permit, message)
}

async fn apply_frame<A: StreamAdapter>(
    adapter: &A,
    frame: Frame,
    permit: OwnedSemaphorePermit,
    user_data: A::UserData,
) -> A::UserData {
    use atproto_sync_core::FrameOutcome;

    match adapter.handle_frame(frame, permit, user_data).await {
        FrameOutcome::Ok(data) => data,
        FrameOutcome::Noop(data) => data,
        FrameOutcome::Error(reason, data) => {
            warn!(reason = %reason, "adapter dropped frame");
            data
        }
    }
}

fn close_reason(frame: Option<CloseFrame>) -> DisconnectReason {
    match frame {
        Some(frame) => DisconnectReason::RemoteClose {
            code: Some(u16::from(frame.code)),
            reason: Some(frame.reason.to_string()),
        },
        None => DisconnectReason::RemoteClose { code: None, reason: None },
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    /// A refused connection (nothing listening on the port) must stop the
    /// engine instead of being retried like a timeout or a dropped socket.
    #[tokio::test]
    async fn connection_refused_is_fatal() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = EngineConfig::new(Url::parse(&format!("ws://127.0.0.1:{port}")).unwrap());
        let (state_tx, _state_rx) = watch::channel(ConnectionState::Disconnected);

        match connect(&config, "/", &[], &state_tx).await {
            Err(ConnectFailure::Fatal(_)) => {}
            Err(ConnectFailure::Transient(reason)) => panic!("expected a fatal failure, got transient: {reason:?}"),
            Ok(_) => panic!("expected connect() to fail against a closed port"),
        }
    }
}
