use std::sync::OnceLock;

use cfgdiff_types::FormatId;
use tracing::debug;

use crate::error::{NormalizeError, NormalizeResult};
use crate::formats::ini::IniNormalizer;
use crate::formats::json::JsonNormalizer;
use crate::normalizer::Normalizer;

/// Builds a normalizer, given the optional dialect selector.
type Constructor = fn(Option<&str>) -> NormalizeResult<Box<dyn Normalizer>>;

// ---------------------------------------------------------------------------
// RegistryEntry
// ---------------------------------------------------------------------------

/// One registered format: its identifier, whether support was compiled in,
/// and the normalizer when it was.
pub struct RegistryEntry {
    /// The format this entry describes.
    pub format: FormatId,
    /// `true` if the format's optional capability is part of this build.
    pub available: bool,
    constructor: Option<Constructor>,
    instance: Option<Box<dyn Normalizer>>,
}

impl RegistryEntry {
    fn new(format: FormatId, constructor: Option<Constructor>) -> Self {
        let instance = constructor.and_then(|build| build(None).ok());
        Self {
            format,
            available: instance.is_some(),
            constructor,
            instance,
        }
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("format", &self.format)
            .field("available", &self.available)
            .finish()
    }
}

fn constructor_for(format: FormatId) -> Option<Constructor> {
    match format {
        FormatId::Ini => Some(|_| Ok(Box::new(IniNormalizer))),
        FormatId::Json => Some(|_| Ok(Box::new(JsonNormalizer))),
        #[cfg(feature = "yaml")]
        FormatId::Yaml => Some(|_| Ok(Box::new(crate::formats::yaml::YamlNormalizer))),
        #[cfg(feature = "xml")]
        FormatId::Xml => Some(|_| Ok(Box::new(crate::formats::xml::XmlNormalizer))),
        #[cfg(feature = "conf")]
        FormatId::Conf => Some(|_| Ok(Box::new(crate::formats::conf::ConfNormalizer))),
        #[cfg(feature = "reconf")]
        FormatId::Reconf => Some(|dialect| {
            Ok(Box::new(crate::formats::reconf::ReconfNormalizer::for_selector(dialect)?))
        }),
        #[cfg(feature = "zone")]
        FormatId::Zone => Some(|_| Ok(Box::new(crate::formats::zone::ZoneNormalizer))),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// FormatRegistry
// ---------------------------------------------------------------------------

/// Maps format identifiers to normalizers.
///
/// Built once per process from the compiled-in Cargo features and read-only
/// afterwards. Entries keep the fixed registration order of
/// [`FormatId::ALL`].
#[derive(Debug)]
pub struct FormatRegistry {
    entries: Vec<RegistryEntry>,
}

impl FormatRegistry {
    /// Build a registry reflecting the features of this build.
    pub fn new() -> Self {
        let entries = FormatId::ALL
            .iter()
            .map(|&format| RegistryEntry::new(format, constructor_for(format)))
            .collect();
        Self { entries }
    }

    /// The process-wide registry.
    pub fn global() -> &'static FormatRegistry {
        static REGISTRY: OnceLock<FormatRegistry> = OnceLock::new();
        REGISTRY.get_or_init(FormatRegistry::new)
    }

    /// All entries, available or not, in registration order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Returns `true` if `format` can be normalized by this build.
    pub fn is_supported(&self, format: FormatId) -> bool {
        self.entry(format).is_some_and(|e| e.available)
    }

    /// The supported formats in registration order.
    pub fn supported(&self) -> Vec<FormatId> {
        self.entries
            .iter()
            .filter(|e| e.available)
            .map(|e| e.format)
            .collect()
    }

    /// The shared normalizer for `format`, using the default dialect where
    /// one applies.
    pub fn normalizer_for(&self, format: FormatId) -> NormalizeResult<&dyn Normalizer> {
        self.entry(format)
            .and_then(|e| e.instance.as_deref())
            .ok_or(NormalizeError::UnsupportedFormat(format))
    }

    /// Build a normalizer for `format` with an explicit dialect selector.
    ///
    /// The selector only affects [`FormatId::Reconf`]; other formats ignore it.
    pub fn build(&self, format: FormatId, dialect: Option<&str>) -> NormalizeResult<Box<dyn Normalizer>> {
        let constructor = self
            .entry(format)
            .filter(|e| e.available)
            .and_then(|e| e.constructor)
            .ok_or(NormalizeError::UnsupportedFormat(format))?;
        if dialect.is_some() && format != FormatId::Reconf {
            debug!(%format, "dialect selector ignored");
        }
        constructor(dialect)
    }

    fn entry(&self, format: FormatId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.format == format)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
