//! TraCI wire format.
//!
//! # Framing
//!
//! All integers are big-endian.
//!
//! ```text
//! message  = u32 total_length (includes these 4 bytes) · command*
//! command  = u8 length · u8 id · payload              (length ≤ 255)
//!          | 0u8 · u32 length · u8 id · payload       (extended)
//! ```
//!
//! Every command sent is answered by a *status* command carrying the same
//! id, a result byte and a description string.  Commands that return data
//! (GETVERSION, variable reads) add a response command after the status.
//!
//! # Typed values
//!
//! Values are prefixed with a one-byte type tag; strings are a `u32` length
//! followed by UTF-8 bytes.

use std::io::{Read, Write};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

use crate::{SumoError, SumoResult};

// ── Command ids ───────────────────────────────────────────────────────────────

pub const CMD_GETVERSION:            u8 = 0x00;
pub const CMD_CLOSE:                 u8 = 0x7F;
pub const CMD_GET_SIM_VARIABLE:      u8 = 0xAB;
pub const RESPONSE_GET_SIM_VARIABLE: u8 = 0xBB;

/// Simulation variable: compute a route between two edges.
pub const FIND_ROUTE: u8 = 0x86;

// ── Result codes ──────────────────────────────────────────────────────────────

pub const RTYPE_OK:             u8 = 0x00;
pub const RTYPE_NOTIMPLEMENTED: u8 = 0x01;
pub const RTYPE_ERR:            u8 = 0xFF;

// ── Type tags ─────────────────────────────────────────────────────────────────

pub const POSITION_2D:     u8 = 0x01;
pub const TYPE_UBYTE:      u8 = 0x07;
pub const TYPE_BYTE:       u8 = 0x08;
pub const TYPE_INTEGER:    u8 = 0x09;
pub const TYPE_DOUBLE:     u8 = 0x0B;
pub const TYPE_STRING:     u8 = 0x0C;
pub const TYPE_DOUBLELIST: u8 = 0x0D;
pub const TYPE_STRINGLIST: u8 = 0x0E;
pub const TYPE_COMPOUND:   u8 = 0x0F;
pub const TYPE_COLOR:      u8 = 0x11;

// ── Typed values ──────────────────────────────────────────────────────────────

/// A self-describing TraCI value.
#[derive(Clone, Debug, PartialEq)]
pub enum TraciValue {
    UByte(u8),
    Byte(i8),
    Int(i32),
    Double(f64),
    String(String),
    StringList(Vec<String>),
    DoubleList(Vec<f64>),
    Compound(Vec<TraciValue>),
    Position2D(f64, f64),
    /// RGBA.
    Color([u8; 4]),
}

impl TraciValue {
    pub fn type_tag(&self) -> u8 {
        match self {
            TraciValue::UByte(_)        => TYPE_UBYTE,
            TraciValue::Byte(_)         => TYPE_BYTE,
            TraciValue::Int(_)          => TYPE_INTEGER,
            TraciValue::Double(_)       => TYPE_DOUBLE,
            TraciValue::String(_)       => TYPE_STRING,
            TraciValue::StringList(_)   => TYPE_STRINGLIST,
            TraciValue::DoubleList(_)   => TYPE_DOUBLELIST,
            TraciValue::Compound(_)     => TYPE_COMPOUND,
            TraciValue::Position2D(..)  => POSITION_2D,
            TraciValue::Color(_)        => TYPE_COLOR,
        }
    }

    /// Append the tag and the value to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.type_tag());
        match self {
            TraciValue::UByte(v) => out.push(*v),
            TraciValue::Byte(v) => out.push(*v as u8),
            TraciValue::Int(v) => put_i32(out, *v),
            TraciValue::Double(v) => put_f64(out, *v),
            TraciValue::String(s) => put_string(out, s),
            TraciValue::StringList(list) => {
                put_len(out, list.len());
                for s in list {
                    put_string(out, s);
                }
            }
            TraciValue::DoubleList(list) => {
                put_len(out, list.len());
                for v in list {
                    put_f64(out, *v);
                }
            }
            TraciValue::Compound(items) => {
                put_len(out, items.len());
                for item in items {
                    item.encode(out);
                }
            }
            TraciValue::Position2D(x, y) => {
                put_f64(out, *x);
                put_f64(out, *y);
            }
            TraciValue::Color(rgba) => out.extend_from_slice(rgba),
        }
    }

    /// Read a tagged value.
    pub fn decode(rd: &mut Reader<'_>) -> SumoResult<TraciValue> {
        let tag = rd.u8()?;
        Self::decode_untagged(tag, rd)
    }

    /// Read a value whose tag has already been consumed.
    pub fn decode_untagged(tag: u8, rd: &mut Reader<'_>) -> SumoResult<TraciValue> {
        Ok(match tag {
            TYPE_UBYTE => TraciValue::UByte(rd.u8()?),
            TYPE_BYTE => TraciValue::Byte(rd.u8()? as i8),
            TYPE_INTEGER => TraciValue::Int(rd.i32()?),
            TYPE_DOUBLE => TraciValue::Double(rd.f64()?),
            TYPE_STRING => TraciValue::String(rd.string()?),
            TYPE_STRINGLIST => {
                let n = rd.count()?;
                let mut list = Vec::with_capacity(n.min(1_024));
                for _ in 0..n {
                    list.push(rd.string()?);
                }
                TraciValue::StringList(list)
            }
            TYPE_DOUBLELIST => {
                let n = rd.count()?;
                let mut list = Vec::with_capacity(n.min(1_024));
                for _ in 0..n {
                    list.push(rd.f64()?);
                }
                TraciValue::DoubleList(list)
            }
            TYPE_COMPOUND => {
                let n = rd.count()?;
                let mut items = Vec::with_capacity(n.min(64));
                for _ in 0..n {
                    items.push(TraciValue::decode(rd)?);
                }
                TraciValue::Compound(items)
            }
            POSITION_2D => TraciValue::Position2D(rd.f64()?, rd.f64()?),
            TYPE_COLOR => TraciValue::Color([rd.u8()?, rd.u8()?, rd.u8()?, rd.u8()?]),
            other => {
                return Err(SumoError::Protocol(format!("unsupported value type 0x{other:02x}")));
            }
        })
    }
}

// ── Writing ───────────────────────────────────────────────────────────────────

pub fn put_i32(out: &mut Vec<u8>, v: i32) {
    let mut b = [0u8; 4];
    BigEndian::write_i32(&mut b, v);
    out.extend_from_slice(&b);
}

pub fn put_u32(out: &mut Vec<u8>, v: u32) {
    let mut b = [0u8; 4];
    BigEndian::write_u32(&mut b, v);
    out.extend_from_slice(&b);
}

pub fn put_f64(out: &mut Vec<u8>, v: f64) {
    let mut b = [0u8; 8];
    BigEndian::write_f64(&mut b, v);
    out.extend_from_slice(&b);
}

/// Untagged string: `u32` byte length followed by the bytes.
pub fn put_string(out: &mut Vec<u8>, s: &str) {
    put_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

fn put_len(out: &mut Vec<u8>, n: usize) {
    put_i32(out, n as i32);
}

/// Frame one command: length prefix, id, payload.
pub fn encode_command(id: u8, payload: &[u8]) -> Vec<u8> {
    let short_len = 1 + 1 + payload.len();
    let mut out = Vec::with_capacity(short_len + 4);
    if short_len <= 255 {
        out.push(short_len as u8);
    } else {
        out.push(0);
        put_u32(&mut out, (short_len + 4) as u32);
    }
    out.push(id);
    out.extend_from_slice(payload);
    out
}

/// Frame a whole message from already-framed commands.
pub fn encode_message(commands: &[Vec<u8>]) -> Vec<u8> {
    let body: usize = commands.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(4 + body);
    put_u32(&mut out, (4 + body) as u32);
    for c in commands {
        out.extend_from_slice(c);
    }
    out
}

/// Write one framed message to `w`.
pub fn write_message<W: Write>(w: &mut W, commands: &[Vec<u8>]) -> SumoResult<()> {
    w.write_all(&encode_message(commands))?;
    w.flush()?;
    Ok(())
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Cursor over a received byte buffer.  Running out of bytes is a protocol
/// error, not an I/O error: the message length said there would be more.
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn u8(&mut self) -> SumoResult<u8> {
        self.buf.read_u8().map_err(truncated)
    }

    pub fn i32(&mut self) -> SumoResult<i32> {
        self.buf.read_i32::<BigEndian>().map_err(truncated)
    }

    pub fn u32(&mut self) -> SumoResult<u32> {
        self.buf.read_u32::<BigEndian>().map_err(truncated)
    }

    pub fn f64(&mut self) -> SumoResult<f64> {
        self.buf.read_f64::<BigEndian>().map_err(truncated)
    }

    pub fn bytes(&mut self, n: usize) -> SumoResult<&'a [u8]> {
        if n > self.buf.len() {
            return Err(truncated_n(n, self.buf.len()));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub fn string(&mut self) -> SumoResult<String> {
        let n = self.u32()? as usize;
        let raw = self.bytes(n)?;
        String::from_utf8(raw.to_vec())
            .map_err(|e| SumoError::Protocol(format!("string is not UTF-8: {e}")))
    }

    fn count(&mut self) -> SumoResult<usize> {
        let n = self.i32()?;
        usize::try_from(n).map_err(|_| SumoError::Protocol(format!("negative length {n}")))
    }
}

fn truncated(_: std::io::Error) -> SumoError {
    SumoError::Protocol("message truncated".into())
}

fn truncated_n(wanted: usize, left: usize) -> SumoError {
    SumoError::Protocol(format!("message truncated: wanted {wanted} bytes, {left} left"))
}

/// One command of a received message.
#[derive(Clone, Debug, PartialEq)]
pub struct RawCommand {
    pub id:      u8,
    pub payload: Vec<u8>,
}

/// Read one message from `r` and split it into commands.
pub fn read_message<R: Read>(r: &mut R) -> SumoResult<Vec<RawCommand>> {
    let total = r.read_u32::<BigEndian>()? as usize;
    if total < 4 {
        return Err(SumoError::Protocol(format!("message length {total} < 4")));
    }
    let mut body = vec![0u8; total - 4];
    r.read_exact(&mut body)?;
    split_commands(&body)
}

/// Split a message body (without the 4-byte total length) into commands.
pub fn split_commands(body: &[u8]) -> SumoResult<Vec<RawCommand>> {
    let mut rd = Reader::new(body);
    let mut out = Vec::new();
    while !rd.is_empty() {
        let short = rd.u8()? as usize;
        let (len, header) = if short == 0 {
            (rd.u32()? as usize, 1 + 4)
        } else {
            (short, 1)
        };
        if len < header + 1 {
            return Err(SumoError::Protocol(format!("command length {len} too small")));
        }
        let id = rd.u8()?;
        let payload = rd.bytes(len - header - 1)?.to_vec();
        out.push(RawCommand { id, payload });
    }
    Ok(out)
}

/// Interpret `cmd` as the status answer to command `expected`.
///
/// Returns the description on success (usually empty) and
/// [`SumoError::Command`] for a non-OK result.
pub fn check_status(cmd: &RawCommand, expected: u8) -> SumoResult<String> {
    if cmd.id != expected {
        return Err(SumoError::Protocol(format!(
            "status for command 0x{:02x}, expected 0x{expected:02x}",
            cmd.id
        )));
    }
    let mut rd = Reader::new(&cmd.payload);
    let result = rd.u8()?;
    let description = rd.string()?;
    match result {
        RTYPE_OK => Ok(description),
        RTYPE_NOTIMPLEMENTED => Err(SumoError::Command {
            cmd:     expected,
            message: format!("not implemented: {description}"),
        }),
        _ => Err(SumoError::Command { cmd: expected, message: description }),
    }
}
