use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{
    unbounded_channel, UnboundedReceiver as Receiver, UnboundedSender as Sender,
};
use tokio::sync::oneshot;
use tokio::sync::Mutex;
use tokio::task::JoinHandle as TaskHandle;

use crate::api::*;

/// The payload of a result line: either the call's return value,
/// or a fault signalled by the host.
type Response = std::result::Result<Value, Fault>;

/// The variants of this enum are used to control the task that is
/// matching calls with results, and forwards host events.
#[derive(Debug)]
enum Msg {
    /// This message signals that a call has been made, and that once
    /// its result is received, it needs to be sent back to the calling
    /// task.
    AwaitResponse(AwaitResponseData),

    /// This message signals that we have received a result line that
    /// needs to be sent to the calling task.
    ///
    /// It can be matched to a made call with the "id" that was sent
    /// alongside the call's payload.
    FulfillResponse { handle: u64, response: Response },

    /// This message signals that we have received an event line.
    ///
    /// In this instance, the host does not expect any response. This
    /// is how cards get notified of state changes and user input.
    FulfillEvent { event: Value },
}

/// Data related to a call made on the host.
///
/// A received result can be matched to a made call with its `handle`,
/// which is sent alongside the call's payload.
///
/// The payload of the result is forwarded to the one-shot sender, so
/// that when making a call, we can suspend a future until its result
/// is available.
#[derive(Debug)]
struct AwaitResponseData {
    handle: u64,
    eventual_response: oneshot::Sender<Response>,
}

/// Read the greeting of the dashboard host.
///
/// Will return an error if the host does not open with an
/// `auth_required` line, which typically means the address does not
/// belong to a dashboard host.
async fn read_greeting(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> anyhow::Result<()> {
    const HOST_GREETING: &str = "auth_required";

    let line = lines
        .next_line()
        .await
        .context("no TCP connection")?
        .context("host closed the connection")?;
    let greeting: Value = serde_json::from_str(&line).context("host greeting was not JSON")?;

    match greeting["type"].as_str() {
        Some(HOST_GREETING) => {
            log::debug!(
                "host version: {}",
                greeting["host_version"].as_str().unwrap_or("unknown")
            );
            Ok(())
        }
        other => anyhow::bail!(
            "host opened with {:?}, expected '{}'",
            other,
            HOST_GREETING
        ),
    }
}

/// Spawns a task that reads lines from the host connection, and sends
/// out either `Msg::FulfillResponse` or `Msg::FulfillEvent` messages.
///
/// # Panics
/// This task terminates with a panic
/// - when the message receiver was dropped,
/// - when the TCP connection is interrupted
/// - when reading/parsing failed
fn read_loop(lines: Lines<BufReader<OwnedReadHalf>>, msg_out: Sender<Msg>) -> TaskHandle<()> {
    async fn try_loop(
        mut lines: Lines<BufReader<OwnedReadHalf>>,
        msg_out: Sender<Msg>,
    ) -> anyhow::Result<()> {
        loop {
            let line = match lines.next_line().await.context("no TCP connection")? {
                Some(line) => line,
                None => anyhow::bail!("host closed the connection"),
            };

            if line.is_empty() {
                continue;
            }

            let mut msg: Value =
                serde_json::from_str(&line).context(format!("host line was not JSON: {}", line))?;

            let msg = match msg["type"].as_str() {
                Some("result") => {
                    let handle = msg["id"].as_u64().context("result line without an id")?;
                    let response = if msg["success"].as_bool().unwrap_or(false) {
                        Ok(msg["result"].take())
                    } else {
                        Err(serde_json::from_value(msg["error"].take())
                            .context(format!("failed to parse fault {}", line))?)
                    };
                    Msg::FulfillResponse { handle, response }
                }
                Some("event") => Msg::FulfillEvent {
                    event: msg["event"].take(),
                },
                _ => {
                    log::debug!("ignoring host line: {}", line);
                    continue;
                }
            };
            msg_out.send(msg).context("msg receiver dropped")?;
        }
    }

    tokio::spawn(async move {
        try_loop(lines, msg_out).await.unwrap(); // let it crash
    })
}

/// Send one line to the dashboard host.
///
/// # Panics
/// Panics if the TCP connection was closed.
async fn send_line(writer: &Arc<Mutex<OwnedWriteHalf>>, line: &str) {
    let mut writer = writer.lock().await;
    writer
        .write_all(line.as_bytes())
        .await
        .expect("no TCP connection");
    writer.write_all(b"\n").await.expect("no TCP connection");
}

/// A single call to the dashboard host.
#[derive(Debug, Clone)]
struct Call {
    method: &'static str,
    params: Value,
}

impl Call {
    /// Compose the wire line for this call: the params object,
    /// extended by "id" and "type" keys.
    fn to_wire(&self, handle: u64) -> String {
        let mut wire = match &self.params {
            Value::Null => serde_json::Map::new(),
            Value::Object(params) => params.clone(),
            other => panic!("call params must be an object, got {}", other),
        };
        wire.insert("id".to_string(), json!(handle));
        wire.insert("type".to_string(), json!(self.method));
        Value::Object(wire).to_string()
    }
}

/// A client to the dashboard host.
#[derive(Clone)]
pub struct HostClient {
    /// A handle on the write half of the TCP stream between this
    /// controller and the dashboard host.
    writer: Arc<Mutex<OwnedWriteHalf>>,

    /// A reference to a global call handle that is increased for each
    /// call, so that results can be traced back to them.
    prev_call_handle: Arc<Mutex<u64>>,

    /// The `Sender` that feeds the message loop.
    msg_out: Sender<Msg>,
}

impl HostClient {
    fn new(writer: OwnedWriteHalf, msg_out: Sender<Msg>) -> HostClient {
        HostClient {
            msg_out,
            writer: Arc::new(Mutex::new(writer)),
            prev_call_handle: Arc::new(Mutex::new(0)),
        }
    }

    /// Make a call, and let the caller handle faults.
    ///
    /// # Panics
    /// - when getting a different return type than expected
    /// - when the TCP connection was closed
    /// - when a channel between tasks was dropped
    async fn call<T>(&self, call: Call) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let call_trace = call.clone();
        let value = self.call_response(call).await?;
        match serde_json::from_value(value) {
            Ok(t) => Ok(t),
            Err(err) => panic!("unexpected return value for {:?}: {}", call_trace, err),
        }
    }

    /// Make a call, and do not expect a fault.
    ///
    /// # Panics
    /// - when encountering a fault after all
    /// - see also: `call` doc
    async fn call_unwrap<T>(&self, call: Call) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        let call_clone = call.clone();
        let res: Result<T> = self.call(call).await;
        match res {
            Ok(t) => t,
            Err(fault) => panic!("unexpected fault {:?} for call {:?}", fault, call_clone),
        }
    }

    async fn call_response(&self, call: Call) -> Response {
        let handle = self.next_handle().await;

        let (resp_out, resp_in) = oneshot::channel::<Response>();

        let data = AwaitResponseData {
            handle,
            eventual_response: resp_out,
        };
        self.msg_out
            .send(Msg::AwaitResponse(data))
            .expect("msg receiver was dropped");

        log::debug!("call {}: {:?}", &handle, &call);

        send_line(&self.writer, &call.to_wire(handle)).await;

        let response = resp_in.await.expect("response sender was dropped");

        log::debug!("call {} response: {:?}", &handle, &response);

        response
    }

    async fn next_handle(&self) -> u64 {
        let mut prev = self.prev_call_handle.lock().await;
        *prev += 1;
        *prev
    }
}

#[async_trait]
impl Calls for HostClient {
    async fn authenticate(&self, access_token: &str) {
        let call = Call {
            method: "auth",
            params: json!({ "access_token": access_token }),
        };
        self.call_unwrap::<()>(call).await;
    }

    async fn subscribe_events(&self) {
        let call = Call {
            method: "subscribe_events",
            params: Value::Null,
        };
        self.call_unwrap::<()>(call).await;
    }

    async fn states(&self) -> Vec<EntityState> {
        let call = Call {
            method: "get_states",
            params: Value::Null,
        };
        self.call_unwrap(call).await
    }

    async fn register_card(&self, descriptor: &CardDescriptor) {
        let call = Call {
            method: "register_card",
            params: json!({ "card": descriptor }),
        };
        self.call_unwrap::<()>(call).await;
    }

    async fn clear_cards(&self, card_type: &str) {
        let call = Call {
            method: "clear_cards",
            params: json!({ "card_type": card_type }),
        };
        self.call_unwrap::<()>(call).await;
    }

    async fn card_helpers(&self) -> Result<CardHelpers> {
        let call = Call {
            method: "get_card_helpers",
            params: Value::Null,
        };
        self.call(call).await
    }

    async fn render_card(&self, card: &str, markup: &str) -> Result<()> {
        let call = Call {
            method: "render_card",
            params: json!({ "card": card, "markup": markup }),
        };
        self.call(call).await
    }

    async fn render_editor(&self, card: &str, markup: &str) -> Result<()> {
        let call = Call {
            method: "render_editor",
            params: json!({ "card": card, "markup": markup }),
        };
        self.call(call).await
    }

    async fn dispatch_action(&self, card: &str, gesture: &str, config: &Value) {
        let call = Call {
            method: "dispatch_action",
            params: json!({ "card": card, "gesture": gesture, "config": config }),
        };
        self.call_unwrap::<()>(call).await;
    }

    async fn config_changed(&self, card: &str, config: &Value) {
        let call = Call {
            method: "config_changed",
            params: json!({ "card": card, "config": config }),
        };
        self.call_unwrap::<()>(call).await;
    }

    async fn set_edit_mode(&self, enable: bool) {
        let call = Call {
            method: "set_edit_mode",
            params: json!({ "enable": enable }),
        };
        self.call_unwrap::<()>(call).await;
    }
}

/// This task consumes all `Msg`s, and produces `Callback`s, as well as
/// responses to waiting receivers of a `HostClient`.
///
/// # Panics
/// This task terminates with a panic once every message sender was
/// dropped. This means that it does not necessarily terminate with the
/// read loop - it will only terminate once any `HostClient`s that
/// still hold a sender are dropped.
fn msg_loop(mut msg_in: Receiver<Msg>, cb_out: Sender<Callback>) -> TaskHandle<()> {
    tokio::spawn(async move {
        let mut waiting_calls: HashMap<u64, AwaitResponseData> = HashMap::new();

        loop {
            match msg_in.recv().await.expect("message receiver disconnected") {
                Msg::AwaitResponse(data) => {
                    waiting_calls.insert(data.handle, data);
                }
                Msg::FulfillResponse { handle, response } => {
                    let _send_result = waiting_calls
                        .remove(&handle)
                        .expect("failed to match incoming result id")
                        .eventual_response
                        .send(response);
                }
                Msg::FulfillEvent { event } => forward_event(&cb_out, event),
            }
        }
    })
}

/// Parse a host event, and forward it to the callback receiver.
///
/// Events this crate does not model are ignored; the host sends events
/// for every subscriber, not just for cards.
fn forward_event(cb_out: &Sender<Callback>, event: Value) {
    match serde_json::from_value::<Callback>(event) {
        Ok(cb) => {
            cb_out.send(cb).expect("callback receiver dropped");
        }
        Err(err) => log::debug!("ignoring host event: {}", err),
    }
}

/// A connection to the dashboard host consists of
/// - a cloneable client to make calls with
/// - a receiver to consume callbacks with
/// - handles for the tasks that run the client & receiver
pub struct HostConnection {
    pub client: HostClient,
    pub callbacks: Receiver<Callback>,
    pub read_handle: TaskHandle<()>,
    pub msg_handle: TaskHandle<()>,
}

impl HostConnection {
    /// Try to connect to the dashboard host.
    ///
    /// # Panics
    /// Panics when the host greets with an unexpected protocol.
    pub async fn new(addr: &str) -> Option<HostConnection> {
        log::debug!("using host address: {}", addr);

        let stream = match TcpStream::connect(addr).await {
            Ok(stream) => stream,
            Err(err) => {
                log::debug!("cannot connect: {}", err);
                return None;
            }
        };

        let (read_half, write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();
        read_greeting(&mut lines)
            .await
            .expect("unexpected host greeting");

        let (msg_out, msg_in) = unbounded_channel();
        let (cb_out, cb_in) = unbounded_channel();

        let msg_from_host = msg_out;
        let msg_from_controller = msg_from_host.clone();

        Some(HostConnection {
            client: HostClient::new(write_half, msg_from_controller),
            callbacks: cb_in,
            read_handle: read_loop(lines, msg_from_host),
            msg_handle: msg_loop(msg_in, cb_out),
        })
    }
}
