use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::lexer::Token;
use super::name::Name;
use crate::error::{NormalizeError, NormalizeResult};

const TYPES: &[(&str, u16)] = &[
    ("A", 1),
    ("NS", 2),
    ("CNAME", 5),
    ("SOA", 6),
    ("PTR", 12),
    ("HINFO", 13),
    ("MX", 15),
    ("TXT", 16),
    ("RP", 17),
    ("AAAA", 28),
    ("LOC", 29),
    ("SRV", 33),
    ("NAPTR", 35),
    ("DNAME", 39),
    ("DS", 43),
    ("SSHFP", 44),
    ("RRSIG", 46),
    ("NSEC", 47),
    ("DNSKEY", 48),
    ("TLSA", 52),
    ("SPF", 99),
    ("CAA", 257),
];

/// A resource record type, ordered by its numeric code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) struct RecordType(u16);

impl RecordType {
    pub(super) const SOA: RecordType = RecordType(6);
    pub(super) const NS: RecordType = RecordType(2);

    pub(super) fn parse(text: &str) -> Option<Self> {
        let upper = text.to_ascii_uppercase();
        if let Some((_, code)) = TYPES.iter().find(|(name, _)| *name == upper) {
            return Some(Self(*code));
        }
        upper
            .strip_prefix("TYPE")
            .and_then(|n| n.parse().ok())
            .map(Self)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match TYPES.iter().find(|(_, code)| *code == self.0) {
            Some((name, _)) => f.write_str(name),
            None => write!(f, "TYPE{}", self.0),
        }
    }
}

/// Recognize a record class mnemonic.
pub(super) fn parse_class(text: &str) -> Option<String> {
    let upper = text.to_ascii_uppercase();
    match upper.as_str() {
        "IN" | "CH" | "CS" | "HS" => Some(upper),
        _ => upper
            .strip_prefix("CLASS")
            .filter(|n| n.parse::<u16>().is_ok())
            .map(|_| upper.clone()),
    }
}

/// Parse a TTL: plain seconds or BIND-style units (`1h30m`, `2w`).
pub(super) fn parse_ttl(text: &str) -> Option<u32> {
    if text.is_empty() || !text.as_bytes()[0].is_ascii_digit() {
        return None;
    }
    if let Ok(seconds) = text.parse::<u32>() {
        return Some(seconds);
    }

    let mut total: u32 = 0;
    let mut number: Option<u32> = None;
    for c in text.chars() {
        if let Some(digit) = c.to_digit(10) {
            number = Some(number.unwrap_or(0).checked_mul(10)?.checked_add(digit)?);
            continue;
        }
        let unit = match c.to_ascii_lowercase() {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86_400,
            'w' => 604_800,
            _ => return None,
        };
        total = total.checked_add(number.take()?.checked_mul(unit)?)?;
    }
    if number.is_some() {
        return None;
    }
    Some(total)
}

/// Field kinds of record types whose rdata cfgdiff canonicalizes.
#[derive(Clone, Copy, Debug)]
enum Field {
    Name,
    U16,
    U32,
    Ttl,
    Text,
}

fn layout(rtype: RecordType) -> Option<&'static [Field]> {
    use Field::*;
    let fields: &'static [Field] = match rtype.0 {
        2 | 5 | 12 | 39 => &[Name],
        6 => &[Name, Name, U32, Ttl, Ttl, Ttl, Ttl],
        15 => &[U16, Name],
        33 => &[U16, U16, U16, Name],
        35 => &[U16, U16, Text, Text, Text, Name],
        _ => return None,
    };
    Some(fields)
}

/// Canonical text of one record's rdata.
pub(super) fn canonicalize(
    rtype: RecordType,
    tokens: &[Token],
    origin: &Name,
    placeholder: &Name,
) -> NormalizeResult<String> {
    if tokens.is_empty() {
        return Err(NormalizeError::Parse(format!("missing rdata for {rtype} record")));
    }

    match rtype.0 {
        1 => {
            let addr: Ipv4Addr = word(&tokens[0])?
                .parse()
                .map_err(|e| NormalizeError::Parse(format!("invalid A address: {e}")))?;
            expect_len(rtype, tokens, 1)?;
            return Ok(addr.to_string());
        }
        28 => {
            let addr: Ipv6Addr = word(&tokens[0])?
                .parse()
                .map_err(|e| NormalizeError::Parse(format!("invalid AAAA address: {e}")))?;
            expect_len(rtype, tokens, 1)?;
            return Ok(addr.to_string());
        }
        _ => {}
    }

    let Some(fields) = layout(rtype) else {
        return Ok(tokens.iter().map(Token::to_text).collect::<Vec<_>>().join(" "));
    };
    expect_len(rtype, tokens, fields.len())?;

    let mut parts = Vec::with_capacity(fields.len());
    for (field, token) in fields.iter().zip(tokens) {
        let part = match field {
            Field::Name => Name::parse(word(token)?, origin)?.relativize(placeholder),
            Field::U16 => word(token)?
                .parse::<u16>()
                .map_err(|e| NormalizeError::Parse(format!("invalid {rtype} field: {e}")))?
                .to_string(),
            Field::U32 => word(token)?
                .parse::<u32>()
                .map_err(|e| NormalizeError::Parse(format!("invalid {rtype} field: {e}")))?
                .to_string(),
            Field::Ttl => parse_ttl(word(token)?)
                .ok_or_else(|| NormalizeError::Parse(format!("invalid {rtype} interval")))?
                .to_string(),
            Field::Text => token.to_text(),
        };
        parts.push(part);
    }
    Ok(parts.join(" "))
}

fn word(token: &Token) -> NormalizeResult<&str> {
    token
        .as_word()
        .ok_or_else(|| NormalizeError::parse("unexpected quoted string"))
}

fn expect_len(rtype: RecordType, tokens: &[Token], expected: usize) -> NormalizeResult<()> {
    if tokens.len() != expected {
        return Err(NormalizeError::Parse(format!(
            "{rtype} record expects {expected} rdata fields, found {}",
            tokens.len()
        )));
    }
    Ok(())
}

/// The SOA minimum field, used as a fallback TTL.
pub(super) fn soa_minimum(tokens: &[Token]) -> Option<u32> {
    tokens.last().and_then(Token::as_word).and_then(parse_ttl)
}
