//! Raw DNSSEC-checked exchange with one upstream server.
//!
//! The query goes out with RD, AD and the EDNS DO bit set. The verdict is
//! read from the response code, the AD flag and the Extended DNS Error
//! option (RFC 8914). Truncated UDP answers are retried over TCP.

use super::dnssec::ede_reason;
use super::{QueryFailure, Validation};
use hickory_resolver::proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_resolver::proto::rr::rdata::opt::{EdnsCode, EdnsOption};
use hickory_resolver::proto::rr::{Name, RecordType};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;

const EDNS_PAYLOAD: u16 = 1232;
const EDE_OPTION: u16 = 15;
const UDP_BUFFER: usize = 4096;

pub(crate) fn build_query(id: u16, name: Name, rtype: RecordType) -> Message {
    let mut edns = Edns::new();
    edns.set_max_payload(EDNS_PAYLOAD);
    edns.set_dnssec_ok(true);

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_authentic_data(true)
        .add_query(Query::query(name, rtype));
    message.set_edns(edns);
    message
}

/// Failure reason carried by the EDE option, if present.
///
/// The option body is a two-byte info code followed by optional UTF-8
/// text. The text wins when present.
pub(crate) fn extended_error(message: &Message) -> Option<String> {
    let edns = message.extensions().as_ref()?;
    let data = match edns.option(EdnsCode::from(EDE_OPTION))? {
        EdnsOption::Unknown(_, data) => data,
        _ => return None,
    };
    if data.len() < 2 {
        return None;
    }
    let info_code = u16::from_be_bytes([data[0], data[1]]);
    let text = String::from_utf8_lossy(&data[2..])
        .trim_end_matches('\0')
        .trim()
        .to_string();
    if text.is_empty() {
        ede_reason(info_code).map(str::to_string)
    } else {
        Some(text)
    }
}

pub(crate) fn read_verdict(message: &Message) -> Validation {
    Validation {
        response_code: message.response_code(),
        authenticated: message.authentic_data(),
        reason: extended_error(message),
    }
}

fn transient(server: SocketAddr, what: impl std::fmt::Display) -> QueryFailure {
    QueryFailure::Transient(format!("{server}: {what}"))
}

/// Sends one validating query and returns the resolver's verdict.
pub(crate) async fn exchange(
    server: SocketAddr,
    name: Name,
    rtype: RecordType,
    limit: Duration,
) -> Result<Validation, QueryFailure> {
    let id = rand::random::<u16>();
    let query = build_query(id, name, rtype)
        .to_vec()
        .map_err(|e| QueryFailure::Refused(e.to_string()))?;

    let mut message = match timeout(limit, exchange_udp(server, &query, id)).await {
        Ok(result) => result?,
        Err(_) => return Err(transient(server, "timed out")),
    };

    if message.truncated() {
        tracing::debug!(server = %server, "truncated answer, retrying over TCP");
        let response = match timeout(limit, exchange_tcp(server, &query)).await {
            Ok(result) => result?,
            Err(_) => return Err(transient(server, "timed out")),
        };
        message = answer_to(&response, id)
            .ok_or_else(|| transient(server, "unmatched TCP response"))?;
    }

    Ok(read_verdict(&message))
}

/// The response to query `id`, if `bytes` is one.
pub(crate) fn answer_to(bytes: &[u8], id: u16) -> Option<Message> {
    Message::from_vec(bytes)
        .ok()
        .filter(|message| message.id() == id && message.message_type() == MessageType::Response)
}

async fn exchange_udp(server: SocketAddr, query: &[u8], id: u16) -> Result<Message, QueryFailure> {
    let local: SocketAddr = if server.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    };
    let socket = UdpSocket::bind(local).await.map_err(|e| transient(server, e))?;
    socket.connect(server).await.map_err(|e| transient(server, e))?;
    socket.send(query).await.map_err(|e| transient(server, e))?;

    // Stray or forged datagrams are dropped; the caller's timeout bounds the wait.
    let mut buf = vec![0u8; UDP_BUFFER];
    loop {
        let len = socket.recv(&mut buf).await.map_err(|e| transient(server, e))?;
        match answer_to(&buf[..len], id) {
            Some(message) => return Ok(message),
            None => tracing::debug!(server = %server, len, "discarding unmatched datagram"),
        }
    }
}

async fn exchange_tcp(server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, QueryFailure> {
    let len = u16::try_from(query.len()).map_err(|e| QueryFailure::Refused(e.to_string()))?;
    let mut stream = TcpStream::connect(server)
        .await
        .map_err(|e| transient(server, e))?;
    stream
        .write_all(&len.to_be_bytes())
        .await
        .map_err(|e| transient(server, e))?;
    stream.write_all(query).await.map_err(|e| transient(server, e))?;

    let mut prefix = [0u8; 2];
    stream
        .read_exact(&mut prefix)
        .await
        .map_err(|e| transient(server, e))?;
    let mut buf = vec![0u8; usize::from(u16::from_be_bytes(prefix))];
    stream
        .read_exact(&mut buf)
        .await
        .map_err(|e| transient(server, e))?;
    Ok(buf)
}
