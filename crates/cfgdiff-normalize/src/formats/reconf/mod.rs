//! Application-specific configuration grammars.
//!
//! Each [`Dialect`] names a grammar that parses a file into a structural
//! model and writes it back through its own canonical writer. The writer
//! decides the output order; the ordering mode is not consulted.

mod ini_like;
mod table;

use std::fmt;

use cfgdiff_types::{FormatId, OrderingMode};

use crate::error::{NormalizeError, NormalizeResult};
use crate::normalizer::Normalizer;

use ini_like::IniGrammar;
use table::TableGrammar;

/// Dialect used when none is requested.
pub const DEFAULT_DIALECT: &str = "SambaConfig";

/// A selectable application grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Samba `smb.conf`.
    Samba,
    /// Supervisor `supervisord.conf`.
    Supervisor,
    /// `/etc/fstab`.
    Fstab,
    /// `/etc/hosts`.
    Hosts,
    /// `/etc/resolv.conf`.
    Resolv,
    /// `/etc/passwd`.
    Passwd,
    /// `/etc/group`.
    Group,
}

impl Dialect {
    /// Every dialect, in the order they are listed to users.
    pub const ALL: [Dialect; 7] = [
        Dialect::Samba,
        Dialect::Supervisor,
        Dialect::Fstab,
        Dialect::Hosts,
        Dialect::Resolv,
        Dialect::Passwd,
        Dialect::Group,
    ];

    /// The selector name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Samba => "SambaConfig",
            Self::Supervisor => "SupervisorConfig",
            Self::Fstab => "FSTabConfig",
            Self::Hosts => "HostsConfig",
            Self::Resolv => "ResolvConfig",
            Self::Passwd => "PasswdConfig",
            Self::Group => "GroupConfig",
        }
    }

    /// Resolve a selector name.
    pub fn from_name(name: &str) -> NormalizeResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name() == name)
            .ok_or_else(|| NormalizeError::UnknownDialect {
                name: name.to_string(),
                available: Self::ALL.map(|d| d.name()).join(", "),
            })
    }

    fn canonicalize(&self, input: &str) -> NormalizeResult<String> {
        match self {
            Self::Samba => IniGrammar::SAMBA.canonicalize(input),
            Self::Supervisor => IniGrammar::SUPERVISOR.canonicalize(input),
            Self::Fstab => TableGrammar::FSTAB.canonicalize(input),
            Self::Hosts => TableGrammar::HOSTS.canonicalize(input),
            Self::Resolv => TableGrammar::RESOLV.canonicalize(input),
            Self::Passwd => TableGrammar::PASSWD.canonicalize(input),
            Self::Group => TableGrammar::GROUP.canonicalize(input),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalizer for [`FormatId::Reconf`], bound to one dialect.
#[derive(Clone, Copy, Debug)]
pub struct ReconfNormalizer {
    dialect: Dialect,
}

impl ReconfNormalizer {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Resolve `name` (or the default dialect) and bind a normalizer to it.
    pub fn for_selector(name: Option<&str>) -> NormalizeResult<Self> {
        Dialect::from_name(name.unwrap_or(DEFAULT_DIALECT)).map(Self::new)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl Normalizer for ReconfNormalizer {
    fn format(&self) -> FormatId {
        FormatId::Reconf
    }

    fn normalize(&self, input: &str, _ordering: OrderingMode) -> NormalizeResult<String> {
        self.dialect.canonicalize(input)
    }
}
