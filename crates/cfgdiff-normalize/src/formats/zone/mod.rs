//! DNS master-file normalizer.
//!
//! Zone files are parsed against the placeholder origin [`ZONE_ORIGIN`],
//! grouped into rdatasets keyed by owner and type, and written one record
//! per line as `<owner> <ttl> <class> <type> <rdata>`.

mod lexer;
mod name;
mod rdata;

use cfgdiff_types::{FormatId, OrderingMode};
use indexmap::IndexMap;
use tracing::debug;

use self::lexer::{Line, Token};
use self::name::Name;
use self::rdata::RecordType;
use crate::error::{NormalizeError, NormalizeResult};
use crate::normalizer::Normalizer;

/// The origin every zone file is parsed against.
pub const ZONE_ORIGIN: &str = "example.com.";

#[derive(Debug)]
struct RdataSet {
    class: String,
    ttl: u32,
    rdatas: Vec<String>,
}

#[derive(Debug)]
struct Node {
    name: Name,
    rdatasets: IndexMap<RecordType, RdataSet>,
}

#[derive(Default)]
struct Zone {
    nodes: IndexMap<Vec<String>, Node>,
}

impl Zone {
    fn add(&mut self, owner: Name, rtype: RecordType, class: String, ttl: u32, rdata: String) {
        let node = self.nodes.entry(owner.canonical_key()).or_insert_with(|| Node {
            name: owner,
            rdatasets: IndexMap::new(),
        });
        let set = node.rdatasets.entry(rtype).or_insert_with(|| RdataSet {
            class,
            ttl,
            rdatas: Vec::new(),
        });
        set.ttl = set.ttl.min(ttl);
        if !set.rdatas.contains(&rdata) {
            set.rdatas.push(rdata);
        }
    }

    fn has(&self, owner: &Name, rtype: RecordType) -> bool {
        self.nodes
            .get(&owner.canonical_key())
            .is_some_and(|node| node.rdatasets.contains_key(&rtype))
    }

    fn sort(&mut self) {
        self.nodes.sort_keys();
        for node in self.nodes.values_mut() {
            node.rdatasets.sort_keys();
        }
    }

    fn write(&self, origin: &Name) -> String {
        let mut out = String::new();
        for node in self.nodes.values() {
            let owner = node.name.relativize(origin);
            for (rtype, set) in &node.rdatasets {
                for rdata in &set.rdatas {
                    out.push_str(&format!("{owner} {} {} {rtype} {rdata}\n", set.ttl, set.class));
                }
            }
        }
        out
    }
}

/// Parser state carried between logical lines.
struct ZoneReader {
    placeholder: Name,
    origin: Name,
    default_ttl: Option<u32>,
    last_ttl: Option<u32>,
    last_owner: Option<Name>,
    zone: Zone,
    /// Records seen before any TTL could be resolved, patched once the SOA is read.
    pending_ttl: Vec<(Vec<String>, RecordType)>,
}

impl ZoneReader {
    fn new() -> NormalizeResult<Self> {
        let placeholder = Name::absolute(ZONE_ORIGIN)?;
        Ok(Self {
            origin: placeholder.clone(),
            placeholder,
            default_ttl: None,
            last_ttl: None,
            last_owner: None,
            zone: Zone::default(),
            pending_ttl: Vec::new(),
        })
    }

    fn read(mut self, lines: Vec<Line>) -> NormalizeResult<Zone> {
        for line in lines {
            let number = line.number;
            self.read_line(line)
                .map_err(|err| relocate(err, number))?;
        }

        if !self.zone.has(&self.placeholder, RecordType::SOA) {
            return Err(NormalizeError::parse("no SOA RR at zone origin"));
        }
        if !self.zone.has(&self.placeholder, RecordType::NS) {
            return Err(NormalizeError::parse("no NS RRset at zone origin"));
        }
        Ok(self.zone)
    }

    fn read_line(&mut self, line: Line) -> NormalizeResult<()> {
        let mut tokens = line.tokens.into_iter().peekable();

        if let Some(directive) = tokens
            .peek()
            .and_then(Token::as_word)
            .filter(|w| w.starts_with('$') && !line.inherits_owner)
            .map(str::to_ascii_uppercase)
        {
            tokens.next();
            let argument = tokens.next().and_then(|t| t.as_word().map(str::to_string));
            return match (directive.as_str(), argument) {
                ("$ORIGIN", Some(arg)) => {
                    self.origin = Name::parse(&arg, &self.origin)?;
                    Ok(())
                }
                ("$TTL", Some(arg)) => {
                    let ttl = rdata::parse_ttl(&arg)
                        .ok_or_else(|| NormalizeError::Parse(format!("invalid $TTL {arg:?}")))?;
                    self.default_ttl = Some(ttl);
                    Ok(())
                }
                ("$ORIGIN" | "$TTL", None) => {
                    Err(NormalizeError::Parse(format!("{directive} requires an argument")))
                }
                _ => Err(NormalizeError::Parse(format!("unsupported directive {directive}"))),
            };
        }

        let owner = if line.inherits_owner {
            self.last_owner
                .clone()
                .ok_or_else(|| NormalizeError::parse("record has no owner name"))?
        } else {
            let text = tokens
                .next()
                .and_then(|t| t.as_word().map(str::to_string))
                .ok_or_else(|| NormalizeError::parse("expected owner name"))?;
            Name::parse(&text, &self.origin)?
        };
        self.last_owner = Some(owner.clone());

        let mut ttl = None;
        let mut class = None;
        let rtype = loop {
            let word = tokens
                .next()
                .and_then(|t| t.as_word().map(str::to_string))
                .ok_or_else(|| NormalizeError::parse("expected record type"))?;
            if ttl.is_none() {
                if let Some(value) = rdata::parse_ttl(&word) {
                    ttl = Some(value);
                    continue;
                }
            }
            if class.is_none() {
                if let Some(value) = rdata::parse_class(&word) {
                    class = Some(value);
                    continue;
                }
            }
            break RecordType::parse(&word)
                .ok_or_else(|| NormalizeError::Parse(format!("unknown record type {word:?}")))?;
        };

        let class = class.unwrap_or_else(|| "IN".to_string());
        if class != "IN" {
            return Err(NormalizeError::Parse(format!("unsupported class {class}")));
        }

        let rest: Vec<Token> = tokens.collect();
        let text = rdata::canonicalize(rtype, &rest, &self.origin, &self.placeholder)?;

        if rtype == RecordType::SOA {
            if let Some(minimum) = rdata::soa_minimum(&rest) {
                self.resolve_pending(minimum);
                if self.default_ttl.is_none() && ttl.is_none() && self.last_ttl.is_none() {
                    ttl = Some(minimum);
                }
            }
        }

        let resolved = ttl.or(self.default_ttl).or(self.last_ttl);
        if let Some(value) = ttl {
            self.last_ttl = Some(value);
        }
        match resolved {
            Some(value) => self.zone.add(owner, rtype, class, value, text),
            None => {
                self.pending_ttl.push((owner.canonical_key(), rtype));
                self.zone.add(owner, rtype, class, u32::MAX, text);
            }
        }
        Ok(())
    }

    fn resolve_pending(&mut self, minimum: u32) {
        for (key, rtype) in self.pending_ttl.drain(..) {
            if let Some(set) = self
                .zone
                .nodes
                .get_mut(&key)
                .and_then(|node| node.rdatasets.get_mut(&rtype))
            {
                if set.ttl == u32::MAX {
                    set.ttl = minimum;
                }
            }
        }
    }
}

/// Attach the logical line number to errors raised without one.
fn relocate(err: NormalizeError, line: usize) -> NormalizeError {
    match err {
        NormalizeError::Parse(message) => NormalizeError::Syntax { line, message },
        other => other,
    }
}

/// Normalizer for DNS zone files.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZoneNormalizer;

impl Normalizer for ZoneNormalizer {
    fn format(&self) -> FormatId {
        FormatId::Zone
    }

    fn normalize(&self, input: &str, ordering: OrderingMode) -> NormalizeResult<String> {
        let lines = lexer::tokenize(input)?;
        let reader = ZoneReader::new()?;
        let origin = reader.placeholder.clone();
        let mut zone = reader.read(lines)?;
        if zone.nodes.values().any(|n| n.rdatasets.values().any(|s| s.ttl == u32::MAX)) {
            return Err(NormalizeError::parse("record has no TTL and no default is available"));
        }

        if ordering.is_sorted() {
            zone.sort();
        }
        debug!(owners = zone.nodes.len(), "normalized zone");
        Ok(zone.write(&origin))
    }
}
