//! Text helpers over record data: name rendering, DNS-SD descriptions,
//! and label extraction from PTR targets.

use super::{LABEL_MARKER, NAME_MARKER, TCP, UDP};
use crate::base::DiscoveryError;
use hickory_resolver::proto::rr::Name;

/// Renders a name in master-file text form with decimal `\DDD` escapes.
///
/// Bytes outside the printable ASCII range (space included) become
/// `\DDD`; `"`, `(`, `)`, `.`, `;`, `\`, `@` and `$` are backslash
/// escaped. The result is always dot-terminated.
pub fn name_to_text(name: &Name) -> String {
    if name.is_root() {
        return ".".to_string();
    }
    let mut text = String::new();
    for label in name.iter() {
        for &b in label {
            match b {
                0..=0x20 | 0x7f..=0xff => text.push_str(&format!("\\{b:03}")),
                b'"' | b'(' | b')' | b'.' | b';' | b'\\' | b'@' | b'$' => {
                    text.push('\\');
                    text.push(b as char);
                }
                _ => text.push(b as char),
            }
        }
        text.push('.');
    }
    text
}

/// True when `rest` opens with any char, `_x`, any char, `_y`, any char
/// and at least one more char: the DNS-SD service tail of an owner name.
fn tail_starts_at(rest: &str) -> bool {
    fn segment(s: &str) -> Vec<&str> {
        // `_[a-z-]+` followed by any single character; returns every
        // possible remainder, longest run first.
        let Some(body) = s.strip_prefix('_') else {
            return Vec::new();
        };
        let run = body
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_lowercase() || *c == '-')
            .count();
        let mut out = Vec::new();
        for k in (1..=run).rev() {
            let after = &body[k..];
            if let Some(c) = after.chars().next() {
                out.push(&after[c.len_utf8()..]);
            }
        }
        out
    }

    let mut chars = rest.chars();
    if chars.next().is_none() {
        return false;
    }
    segment(chars.as_str())
        .into_iter()
        .flat_map(segment)
        .any(|remainder| !remainder.is_empty())
}

/// Human-readable instance description from a DNS-SD owner name.
///
/// Drops the `._type._proto.domain.` tail, then decodes `\DDD` byte
/// escapes (as UTF-8) and `\c` character escapes.
///
/// `"Caf\195\169\032Bar._http._tcp.example.com."` → `"Café Bar"`
pub fn dns_sd_description(owner: &str) -> String {
    let instance = owner
        .char_indices()
        .find(|(idx, _)| tail_starts_at(&owner[*idx..]))
        .map(|(idx, _)| &owner[..idx])
        .unwrap_or(owner);
    String::from_utf8_lossy(&unescape(instance)).into_owned()
}

fn unescape(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            let digits = &bytes[i + 1..bytes.len().min(i + 4)];
            if digits.len() == 3 && digits.iter().all(u8::is_ascii_digit) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
            i += 1;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn blank(rdata: &str) -> Result<(), DiscoveryError> {
    if rdata.trim().is_empty() {
        Err(DiscoveryError::IllegalFqdn(
            "rData cannot be null, empty, or blank".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// `_0._tcp.example.com.` → `_0._tcp`; `x._label.y` → `x`.
pub fn dns_label_from_rdata(rdata: &str) -> Result<String, DiscoveryError> {
    blank(rdata)?;
    if let Some(idx) = rdata.find(LABEL_MARKER) {
        return Ok(rdata[..idx].to_string());
    }
    let labels: Vec<&str> = rdata.trim().split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return Err(DiscoveryError::IllegalFqdn(format!(
            "rData does not have enough labels to return dns label for a service type: {rdata}"
        )));
    }
    if labels[1] == TCP || labels[1] == UDP {
        Ok(format!("{}.{}", labels[0], labels[1]))
    } else {
        Err(DiscoveryError::IllegalFqdn(format!(
            "Could not extract DNS Label from rData: {rdata}"
        )))
    }
}

/// `Printer._name.example.com.` → `Printer`.
pub fn service_type_name_from_rdata(rdata: &str) -> Result<String, DiscoveryError> {
    blank(rdata)?;
    rdata
        .find(NAME_MARKER)
        .map(|idx| rdata[..idx].trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            DiscoveryError::IllegalFqdn(format!(
                "Could not extract Service Type name from rData: {rdata}"
            ))
        })
}

/// Service type advertised by a `_services._dns-sd._udp` PTR target:
/// its first two labels, `_coap._udp.example.com.` → `_coap._udp`.
pub fn service_type_from_rdata(rdata: &str) -> Result<String, DiscoveryError> {
    blank(rdata)?;
    let labels: Vec<&str> = rdata.trim().split('.').collect();
    if labels.len() < 3 {
        return Err(DiscoveryError::IllegalFqdn(format!(
            "Invalid RData for a service type PTR: {rdata}"
        )));
    }
    Ok(format!("{}.{}", labels[0], labels[1]))
}

/// Parses master-file text (`\DDD` and `\c` escapes allowed) into a name.
///
/// Any other byte, `"` included, is taken literally.
pub fn text_to_name(text: &str) -> Result<Name, DiscoveryError> {
    let mut labels: Vec<Vec<u8>> = Vec::new();
    let mut current = Vec::new();
    let mut escaped = String::new();
    let mut chars = text.trim().chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                escaped.clear();
                escaped.push('\\');
                escaped.extend(chars.clone().take(3));
                let digits = &escaped[1..];
                if digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()) {
                    current.extend(unescape(&escaped));
                    chars.nth(2);
                } else if let Some(next) = chars.next() {
                    let mut buf = [0u8; 4];
                    current.extend_from_slice(next.encode_utf8(&mut buf).as_bytes());
                }
            }
            '.' => {
                if current.is_empty() {
                    if chars.as_str().is_empty() {
                        break;
                    }
                    return Err(DiscoveryError::IllegalFqdn(text.to_string()));
                }
                labels.push(std::mem::take(&mut current));
            }
            _ => {
                let mut buf = [0u8; 4];
                current.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    if !current.is_empty() {
        labels.push(current);
    }
    Name::from_labels(labels).map_err(|_| DiscoveryError::IllegalFqdn(text.to_string()))
}
