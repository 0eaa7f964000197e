use crate::domain::{PlayerInput, SimEvent, WorldUpdate};
use crate::interface_adapters::protocol::{
    ClientMessage, ConfigDto, InitDto, ServerMessage, WorldUpdateDto,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::next_conn_id;
use crate::use_cases::GameEvent;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
    EventsClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

/// Serializes each world snapshot once and broadcasts the shared bytes so no
/// per-connection task pays the serialization cost.
pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::GameState(WorldUpdateDto::from(&update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world snapshot");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Store the latest bytes for lag recovery.
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "snapshot serializer lagged; skipping to latest");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world snapshot channel closed; serializer exiting");
                break;
            }
        }
    }
}

/// Same serialize-once fan-out for discrete game events.
pub async fn event_serializer(
    mut event_rx: broadcast::Receiver<SimEvent>,
    event_bytes_tx: broadcast::Sender<Utf8Bytes>,
) {
    loop {
        match event_rx.recv().await {
            Ok(ev) => {
                let msg = ServerMessage::from(&ev);
                match serde_json::to_string(&msg) {
                    Ok(txt) => {
                        let _ = event_bytes_tx.send(Utf8Bytes::from(txt));
                    }
                    Err(e) => error!(error = ?e, "failed to serialize game event"),
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                // Events are advisory; the next snapshot resyncs clients.
                warn!(missed = n, "event serializer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("event channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let player_id = next_conn_id();
    let span = info_span!("conn", player_id);
    let _enter = span.enter();

    let mut ctx = match bootstrap_connection(&mut socket, &state, player_id).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };

    info!("client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    pub player_id: u64,
    pub input_tx: mpsc::Sender<GameEvent>,
    pub world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub event_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub world_latest_rx: watch::Receiver<Utf8Bytes>,
    // Count lag recovery snapshots sent to this client.
    pub lag_recovery_count: u64,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,

    pub invalid_json: u32,

    pub last_input_full_log: Instant,
    pub last_world_lag_log: Instant,
    pub last_invalid_input_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    state: &Arc<AppState>,
    player_id: u64,
) -> Result<ConnCtx, NetError> {
    // Subscribe to updates *before* any await so no tick is missed between
    // the init snapshot and the first live broadcast.
    let world_bytes_rx = state.world_bytes_tx.subscribe();
    let event_bytes_rx = state.event_bytes_tx.subscribe();
    let world_latest_rx = state.world_latest_tx.subscribe();

    // Join happens before init so the snapshot the client receives next tick
    // already includes its own freshly spawned record.
    state
        .input_tx
        .send(GameEvent::Join { player_id })
        .await
        .map_err(|_| NetError::InputClosed)?;

    // Init payload: identity, the constant table, and the current snapshot.
    // Clone out of the watch borrow immediately; never hold it across awaits.
    let snapshot = state.snapshot_rx.borrow().clone();
    let init = ServerMessage::Init(InitDto {
        player_id: player_id.to_string(),
        config: ConfigDto::new(&state.tuning, state.tick_rate),
        snapshot: WorldUpdateDto::from(&snapshot),
    });
    if let Err(e) = send_message(socket, &init).await {
        // Compensate with Leave to avoid "spawned but never connected".
        state
            .input_tx
            .send(GameEvent::Leave { player_id })
            .await
            .map_err(|_| NetError::InputClosed)?;
        return Err(e);
    }

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        player_id,
        input_tx: state.input_tx.clone(),
        world_bytes_rx,
        event_bytes_rx,
        world_latest_rx,
        lag_recovery_count: 0,

        msgs_in: 0,
        msgs_out: 0,
        bytes_in: 0,
        bytes_out: 0,

        invalid_json: 0,

        last_input_full_log: now,
        last_world_lag_log: now,
        last_invalid_input_log: now,

        close_frame: None,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

/// Malformed fields degrade to neutral values instead of faulting the
/// connection: a non-finite angle is ignored, nothing else can be invalid.
fn sanitize_input(mut input: PlayerInput) -> PlayerInput {
    if let Some(angle) = input.angle {
        if !angle.is_finite() {
            input.angle = None;
        }
    }
    input
}

fn forward_game_event(
    input_tx: &mpsc::Sender<GameEvent>,
    event: GameEvent,
    player_id: u64,
    last_input_full_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    match input_tx.try_send(event) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(last_input_full_log) {
                warn!(player_id, "input channel full; dropping event");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let player_id = ctx.player_id;

    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        input_tx,
        world_bytes_rx,
        event_bytes_rx,
        world_latest_rx,
        lag_recovery_count,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_json,
        last_input_full_log,
        last_world_lag_log,
        last_invalid_input_log,
        close_frame,
        ..
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            // Incoming message from the client.
            incoming = socket.recv() => {
                match handle_incoming_ws(
                    socket,
                    incoming,
                    player_id,
                    input_tx,
                    msgs_in,
                    bytes_in,
                    msgs_out,
                    bytes_out,
                    invalid_json,
                    last_input_full_log,
                    last_invalid_input_log,
                    close_frame,
                ).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing per-tick snapshot.
            world_msg = world_bytes_rx.recv() => {
                match world_msg {
                    Ok(bytes) => match forward_bytes(bytes, socket, msgs_out, bytes_out).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(last_world_lag_log) {
                            warn!(missed = n, "snapshots lagged; sending latest");
                        }

                        // Resync strategy: send the latest snapshot.
                        let latest = world_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            *lag_recovery_count += 1;
                            match forward_bytes(latest, socket, msgs_out, bytes_out).await {
                                LoopControl::Continue => false,
                                LoopControl::Disconnect => true,
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::WorldUpdatesClosed);
                        true
                    }
                }
            }

            // Outgoing discrete game events.
            event_msg = event_bytes_rx.recv() => {
                match event_msg {
                    Ok(bytes) => match forward_bytes(bytes, socket, msgs_out, bytes_out).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Dropped events are recovered by the next snapshot.
                        if should_log(last_world_lag_log) {
                            warn!(missed = n, "events lagged; relying on snapshot resync");
                        }
                        false
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::EventsClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(
        player_id,
        input_tx,
        *msgs_in,
        *msgs_out,
        *bytes_in,
        *bytes_out,
        *invalid_json,
        *lag_recovery_count,
    )
    .await
    {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    if let Some(err) = fatal {
        Err(err)
    } else {
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, axum::Error>>,
    player_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
    msgs_in: &mut u64,
    bytes_in: &mut u64,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
    invalid_json: &mut u32,
    last_input_full_log: &mut Instant,
    last_invalid_input_log: &mut Instant,
    close_frame: &mut Option<CloseFrame>,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                *msgs_in += 1;
                *bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Input(input)) => {
                        let input = sanitize_input(input.into());
                        forward_game_event(
                            input_tx,
                            GameEvent::Input { player_id, input },
                            player_id,
                            last_input_full_log,
                        )
                    }
                    Ok(ClientMessage::Shoot(shoot)) => forward_game_event(
                        input_tx,
                        GameEvent::Shoot {
                            player_id,
                            charge: shoot.charge,
                        },
                        player_id,
                        last_input_full_log,
                    ),
                    Ok(ClientMessage::Ping(ping)) => {
                        // Pings never touch the simulation; echo inline.
                        let pong = ServerMessage::Pong { token: ping.token };
                        match send_message(socket, &pong).await {
                            Ok(bytes) => {
                                *msgs_out += 1;
                                *bytes_out += bytes as u64;
                                Ok(LoopControl::Continue)
                            }
                            Err(err) => {
                                warn!(error = ?err, "failed to send pong");
                                Ok(LoopControl::Disconnect)
                            }
                        }
                    }
                    Err(parse_err) => {
                        *invalid_json += 1;
                        if should_log(last_invalid_input_log) {
                            warn!(
                                player_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if *invalid_json > MAX_INVALID_JSON {
                            *close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                *close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(player_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(player_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_bytes(
    bytes: Utf8Bytes,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    let bytes_len = bytes.len();
    match socket.send(Message::Text(bytes)).await.map_err(NetError::Ws) {
        Ok(()) => {
            *msgs_out += 1;
            *bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send outbound message");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(
    player_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    invalid_json: u32,
    lag_recovery_count: u64,
) -> Result<(), NetError> {
    // The record leaves with the connection; bullets it fired stay live.
    input_tx
        .send(GameEvent::Leave { player_id })
        .await
        .map_err(|_| NetError::InputClosed)?;

    debug!(
        player_id,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_json,
        lag_recovery_count,
        "connection stats"
    );
    info!(player_id, "client disconnected");
    Ok(())
}
