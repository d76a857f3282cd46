//! Connection fitting at the start of a segment, and how many segments may
//! leave a node of each kind.

use core::fmt;

use crate::error::{TopologyError, TopologyResult};

/// Fitting at a segment's start node. A property of the node, shared by every
/// segment leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnectionType {
    /// Water entry (reservoir outlet, supply point).
    Entry,
    Tee,
    Cross,
}

impl ConnectionType {
    pub const ALL: [ConnectionType; 3] = [
        ConnectionType::Entry,
        ConnectionType::Tee,
        ConnectionType::Cross,
    ];

    /// Parse free text, ignoring case and accents.
    ///
    /// Accepts the Portuguese field labels (`Entrada de Água`, `Tê`,
    /// `Cruzeta`) as well as `entry`, `tee` and `cross`. One of the words of
    /// `text` must be a known name; partial words do not count.
    pub fn parse(text: &str) -> TopologyResult<Self> {
        let folded = fold(text);
        let has = |names: &[&str]| {
            folded
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| names.contains(&word))
        };
        if has(&["entrada", "entry"]) {
            Ok(ConnectionType::Entry)
        } else if has(&["cruzeta", "cross"]) {
            Ok(ConnectionType::Cross)
        } else if has(&["te", "tee"]) {
            Ok(ConnectionType::Tee)
        } else {
            Err(TopologyError::UnknownConnectionType {
                text: text.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Entry => "Entry",
            ConnectionType::Tee => "Tee",
            ConnectionType::Cross => "Cross",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ConnectionType {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Lowercase and strip the diacritics used in Portuguese.
fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Maximum outgoing segments per start node, by connection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityMap {
    pub entry: u32,
    pub tee: u32,
    pub cross: u32,
}

impl Default for CapacityMap {
    fn default() -> Self {
        Self {
            entry: 1,
            tee: 2,
            cross: 3,
        }
    }
}

impl CapacityMap {
    /// Every capacity must allow at least one outgoing segment.
    pub fn new(entry: u32, tee: u32, cross: u32) -> TopologyResult<Self> {
        let map = Self { entry, tee, cross };
        map.validate()?;
        Ok(map)
    }

    pub fn validate(&self) -> TopologyResult<()> {
        for kind in ConnectionType::ALL {
            let value = self.capacity(kind);
            if value < 1 {
                return Err(TopologyError::InvalidCapacity { kind, value });
            }
        }
        Ok(())
    }

    pub fn capacity(&self, kind: ConnectionType) -> u32 {
        match kind {
            ConnectionType::Entry => self.entry,
            ConnectionType::Tee => self.tee,
            ConnectionType::Cross => self.cross,
        }
    }
}
