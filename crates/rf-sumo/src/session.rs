//! Scoped TraCI sessions against a headless `sumo` process.
//!
//! # Lifecycle
//!
//! [`TraciSession::launch`] picks a free local port, starts
//! `sumo -n <net> --no-step-log --no-warnings --remote-port <port>`,
//! connects (retrying while SUMO loads the network), and checks the API
//! version.  The session is released exactly once, either by an explicit
//! [`close`](TraciSession::close), which reports errors, or by `Drop`, which
//! logs them.  Release sends `CLOSE`, shuts the socket down, and reaps the
//! child process (killing it if the close handshake failed).

use std::ffi::OsString;
use std::net::{Shutdown, TcpListener, TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use crate::codec::{
    self, RawCommand, Reader, TraciValue, CMD_CLOSE, CMD_GETVERSION, CMD_GET_SIM_VARIABLE,
    FIND_ROUTE, RESPONSE_GET_SIM_VARIABLE,
};
use crate::env::SumoHome;
use crate::{SumoError, SumoResult};

// ── ServerConfig ──────────────────────────────────────────────────────────────

/// How to start and reach the headless SUMO server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub binary:          PathBuf,
    pub net_file:        PathBuf,
    /// Connection attempts before giving up.
    pub connect_retries: u32,
    /// Pause between connection attempts.
    pub retry_delay:     Duration,
}

impl ServerConfig {
    pub fn new(sumo: &SumoHome, net_file: impl Into<PathBuf>) -> Self {
        Self {
            binary:          sumo.binary("sumo"),
            net_file:        net_file.into(),
            connect_retries: 60,
            retry_delay:     Duration::from_millis(250),
        }
    }

    /// Command-line arguments for a server listening on `port`.
    pub fn args(&self, port: u16) -> Vec<OsString> {
        vec![
            "-n".into(),
            self.net_file.clone().into_os_string(),
            "--no-step-log".into(),
            "--no-warnings".into(),
            "--remote-port".into(),
            port.to_string().into(),
        ]
    }
}

// ── Stage ─────────────────────────────────────────────────────────────────────

/// Result of a `FIND_ROUTE` query (a TraCI "stage" compound).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Stage {
    pub vtype:       String,
    pub edges:       Vec<String>,
    pub travel_time: f64,
    pub cost:        f64,
    pub length:      f64,
}

impl Stage {
    /// Decode from the stage compound.  Field order:
    /// `type, vType, line, destStop, edges, travelTime, cost, length, ...`.
    pub fn from_compound(items: &[TraciValue]) -> SumoResult<Self> {
        let bad = |what: &str| SumoError::Protocol(format!("stage compound: bad {what}"));
        if items.len() < 8 {
            return Err(SumoError::Protocol(format!(
                "stage compound has {} items, expected at least 8",
                items.len()
            )));
        }
        let TraciValue::String(vtype) = &items[1] else { return Err(bad("vType")) };
        let TraciValue::StringList(edges) = &items[4] else { return Err(bad("edges")) };
        let TraciValue::Double(travel_time) = items[5] else { return Err(bad("travelTime")) };
        let TraciValue::Double(cost) = items[6] else { return Err(bad("cost")) };
        let TraciValue::Double(length) = items[7] else { return Err(bad("length")) };
        Ok(Stage {
            vtype: vtype.clone(),
            edges: edges.clone(),
            travel_time,
            cost,
            length,
        })
    }
}

// ── TraciSession ──────────────────────────────────────────────────────────────

/// An open TraCI connection, optionally owning the server process.
pub struct TraciSession {
    stream:      TcpStream,
    child:       Option<Child>,
    api_version: i32,
    closed:      bool,
}

impl TraciSession {
    /// Start a headless SUMO server and connect to it.
    pub fn launch(config: &ServerConfig) -> SumoResult<Self> {
        let port = free_port()?;
        let mut child = Command::new(&config.binary)
            .args(config.args(port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|source| SumoError::Launch {
                binary: config.binary.display().to_string(),
                source,
            })?;
        log::debug!("started {} (pid {}) on port {port}", config.binary.display(), child.id());

        match connect_with_retry(port, &mut child, config) {
            Ok(stream) => Self::handshake(stream, Some(child)),
            Err(e) => {
                reap(&mut child, true);
                Err(e)
            }
        }
    }

    /// Connect to an already running TraCI server (no process ownership).
    pub fn connect<A: ToSocketAddrs>(addr: A) -> SumoResult<Self> {
        let stream = TcpStream::connect(addr)?;
        Self::handshake(stream, None)
    }

    fn handshake(stream: TcpStream, child: Option<Child>) -> SumoResult<Self> {
        stream.set_nodelay(true)?;
        let mut session = TraciSession { stream, child, api_version: 0, closed: false };
        // On failure `session` drops here, which closes it.
        let (api, sumo_version) = session.get_version()?;
        session.api_version = api;
        log::debug!("TraCI session open: API {api}, {sumo_version}");
        Ok(session)
    }

    pub fn api_version(&self) -> i32 {
        self.api_version
    }

    /// `(api_version, sumo_version_string)`.
    pub fn get_version(&mut self) -> SumoResult<(i32, String)> {
        let reply = self.request(CMD_GETVERSION, &[])?;
        let cmd = response_command(&reply, CMD_GETVERSION)?;
        let mut rd = Reader::new(&cmd.payload);
        Ok((rd.i32()?, rd.string()?))
    }

    /// Ask SUMO for the fastest route from `from` to `to`.
    ///
    /// An unroutable pair yields a stage with no edges; unknown edge IDs
    /// yield [`SumoError::Command`].
    pub fn find_route(
        &mut self,
        from: &str,
        to: &str,
        vtype: &str,
        depart: f64,
        routing_mode: i32,
    ) -> SumoResult<Stage> {
        let mut payload = vec![FIND_ROUTE];
        codec::put_string(&mut payload, "");
        TraciValue::Compound(vec![
            TraciValue::String(from.to_owned()),
            TraciValue::String(to.to_owned()),
            TraciValue::String(vtype.to_owned()),
            TraciValue::Double(depart),
            TraciValue::Int(routing_mode),
        ])
        .encode(&mut payload);

        let reply = self.request(CMD_GET_SIM_VARIABLE, &payload)?;
        let cmd = response_command(&reply, RESPONSE_GET_SIM_VARIABLE)?;

        let mut rd = Reader::new(&cmd.payload);
        let var = rd.u8()?;
        let _object = rd.string()?;
        if var != FIND_ROUTE {
            return Err(SumoError::Protocol(format!(
                "expected variable 0x{FIND_ROUTE:02x}, got 0x{var:02x}"
            )));
        }
        match TraciValue::decode(&mut rd)? {
            TraciValue::Compound(items) => Stage::from_compound(&items),
            other => Err(SumoError::Protocol(format!(
                "FIND_ROUTE returned type 0x{:02x}, expected compound",
                other.type_tag()
            ))),
        }
    }

    /// Close the session, reporting any failure.
    pub fn close(mut self) -> SumoResult<()> {
        self.shutdown()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Send one command and return the whole reply after checking its status.
    fn request(&mut self, id: u8, payload: &[u8]) -> SumoResult<Vec<RawCommand>> {
        if self.closed {
            return Err(SumoError::Closed);
        }
        self.exchange(id, payload)
    }

    fn exchange(&mut self, id: u8, payload: &[u8]) -> SumoResult<Vec<RawCommand>> {
        codec::write_message(&mut self.stream, &[codec::encode_command(id, payload)])?;
        let reply = codec::read_message(&mut self.stream)?;
        let status = reply
            .first()
            .ok_or_else(|| SumoError::Protocol("empty reply".into()))?;
        let description = codec::check_status(status, id)?;
        if !description.is_empty() {
            log::debug!("TraCI 0x{id:02x}: {description}");
        }
        Ok(reply)
    }

    fn shutdown(&mut self) -> SumoResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self.exchange(CMD_CLOSE, &[]).map(|_| ());
        let _ = self.stream.shutdown(Shutdown::Both);
        if let Some(child) = self.child.as_mut() {
            reap(child, result.is_err());
        }
        self.child = None;
        log::debug!("TraCI session closed");
        result
    }
}

impl Drop for TraciSession {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("closing TraCI session: {e}");
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The response command with id `id` following the status in `reply`.
fn response_command(reply: &[RawCommand], id: u8) -> SumoResult<&RawCommand> {
    reply[1..]
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| SumoError::Protocol(format!("reply lacks response command 0x{id:02x}")))
}

/// Ask the OS for an unused local port.
fn free_port() -> SumoResult<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

fn connect_with_retry(port: u16, child: &mut Child, config: &ServerConfig) -> SumoResult<TcpStream> {
    let attempts = config.connect_retries.max(1);
    for attempt in 1..=attempts {
        if let Some(status) = child.try_wait()? {
            return Err(SumoError::ServerExited(status));
        }
        match TcpStream::connect(("127.0.0.1", port)) {
            Ok(stream) => {
                log::debug!("connected to port {port} on attempt {attempt}");
                return Ok(stream);
            }
            Err(_) => thread::sleep(config.retry_delay),
        }
    }
    Err(SumoError::Connect { port, attempts })
}

/// Wait for the child to exit, killing it first if `kill` is set.
fn reap(child: &mut Child, kill: bool) {
    if kill {
        let _ = child.kill();
    }
    if let Err(e) = child.wait() {
        log::warn!("waiting for sumo (pid {}): {e}", child.id());
    }
}
