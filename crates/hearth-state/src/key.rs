//! Record key codec.
//!
//! A record key is `{asset_id}{channel_code}{timestamp}` with no
//! separators:
//!
//! ```text
//! NT01  T02  20250725T103258Z
//! ^^^^  ^^^  ^^^^^^^^^^^^^^^^
//! asset code timestamp (16 bytes, ISO-8601 basic, UTC)
//! ```
//!
//! Channel code and timestamp are fixed width, so the only boundary a
//! decoder cannot find on its own is the end of the asset id. Callers
//! always know it, because they built the scan prefix themselves.
//!
//! Since nothing separates the asset id from the channel code, an asset id
//! that is a proper prefix of another one can shadow the other asset's
//! keys. [`check_prefix_free`] detects such catalogs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDateTime, SubsecRound, Timelike, Utc};
use hearth_core::Category;
use serde::{Serialize, Serializer};

use crate::error::{StateError, StateResult};

/// `chrono` format of the key timestamp (`20250725T103258Z`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Encoded timestamp width in bytes.
pub const TIMESTAMP_WIDTH: usize = 16;

/// Encoded channel code width in bytes.
pub const CHANNEL_CODE_WIDTH: usize = 3;

// ── Channel code ───────────────────────────────────────────────────

/// Sub-kind of a channel, encoded as its leading letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelKind {
    /// `T`: measurement channel.
    Measurement,
    /// `O`: on/off state channel.
    State,
    /// `N`: notification channel.
    Notification,
}

impl ChannelKind {
    pub fn letter(self) -> char {
        match self {
            ChannelKind::Measurement => 'T',
            ChannelKind::State => 'O',
            ChannelKind::Notification => 'N',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'T' => Some(ChannelKind::Measurement),
            'O' => Some(ChannelKind::State),
            'N' => Some(ChannelKind::Notification),
            _ => None,
        }
    }

    /// The kind of channel streams of `category` normally use.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Utilization => ChannelKind::Measurement,
            Category::Alarm => ChannelKind::State,
            Category::Notification => ChannelKind::Notification,
        }
    }
}

/// One letter plus a zero-padded two digit channel number (`T02`, `O01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelCode {
    kind: ChannelKind,
    number: u8,
}

impl ChannelCode {
    pub fn new(kind: ChannelKind, number: u8) -> StateResult<Self> {
        if number > 99 {
            return Err(StateError::InvalidKeyComponent(format!(
                "channel number {number} does not fit two digits"
            )));
        }
        Ok(ChannelCode { kind, number })
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn number(&self) -> u8 {
        self.number
    }
}

impl fmt::Display for ChannelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.kind.letter(), self.number)
    }
}

impl FromStr for ChannelCode {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            StateError::InvalidKeyComponent(format!(
                "channel code {s:?} is not one of T/O/N followed by two digits"
            ))
        };
        let bytes = s.as_bytes();
        if bytes.len() != CHANNEL_CODE_WIDTH {
            return Err(invalid());
        }
        let kind = ChannelKind::from_letter(bytes[0] as char).ok_or_else(invalid)?;
        if !bytes[1].is_ascii_digit() || !bytes[2].is_ascii_digit() {
            return Err(invalid());
        }
        let number = (bytes[1] - b'0') * 10 + (bytes[2] - b'0');
        Ok(ChannelCode { kind, number })
    }
}

// ── Timestamp ──────────────────────────────────────────────────────

/// A UTC instant at whole-second precision, years 0000 through 9999.
///
/// Within that range the compact encoding sorts bytewise in chronological
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap `instant`, rejecting anything the fixed format cannot hold.
    pub fn new(instant: DateTime<Utc>) -> StateResult<Self> {
        if !(0..=9999).contains(&instant.year()) {
            return Err(StateError::InvalidKeyComponent(format!(
                "timestamp {instant} is outside years 0000-9999"
            )));
        }
        if instant.nanosecond() != 0 {
            return Err(StateError::InvalidKeyComponent(format!(
                "timestamp {instant} has sub-second precision"
            )));
        }
        Ok(Timestamp(instant))
    }

    /// Wrap `instant`, dropping any sub-second part.
    pub fn truncated(instant: DateTime<Utc>) -> StateResult<Self> {
        Self::new(instant.trunc_subsecs(0))
    }

    pub fn now() -> Self {
        // The current time is always inside the representable range.
        Timestamp(Utc::now().trunc_subsecs(0))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Compact label as stored in keys (`20250725T103258Z`).
    pub fn label(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse exactly one 16-byte compact timestamp.
    pub fn parse_compact(s: &str) -> Result<Self, String> {
        let bytes = s.as_bytes();
        if bytes.len() != TIMESTAMP_WIDTH {
            return Err(format!(
                "expected {TIMESTAMP_WIDTH} bytes, found {}",
                bytes.len()
            ));
        }
        let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
            8 => *b == b'T',
            15 => *b == b'Z',
            _ => b.is_ascii_digit(),
        });
        if !shape_ok {
            return Err("expected YYYYMMDDTHHMMSSZ".to_string());
        }
        let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|e| e.to_string())?;
        Ok(Timestamp(naive.and_utc()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse_compact(s).map_err(|reason| {
            StateError::InvalidKeyComponent(format!("timestamp {s:?}: {reason}"))
        })
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Record key ─────────────────────────────────────────────────────

/// A decoded record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    asset_id: String,
    channel: ChannelCode,
    timestamp: Timestamp,
}

impl RecordKey {
    pub fn new(asset_id: &str, channel: ChannelCode, timestamp: Timestamp) -> StateResult<Self> {
        validate_asset_id(asset_id)?;
        Ok(RecordKey {
            asset_id: asset_id.to_string(),
            channel,
            timestamp,
        })
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn channel(&self) -> ChannelCode {
        self.channel
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Scan prefix shared by every record of this key's channel.
    pub fn prefix(&self) -> String {
        format!("{}{}", self.asset_id, self.channel)
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}", self.asset_id, self.channel, self.timestamp)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.asset_id, self.channel, self.timestamp)
    }
}

/// Asset ids are non-empty and limited to ASCII letters, digits, `-`, `_`.
pub fn validate_asset_id(asset_id: &str) -> StateResult<()> {
    if asset_id.is_empty() {
        return Err(StateError::InvalidKeyComponent("asset id is empty".to_string()));
    }
    if let Some(bad) = asset_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(StateError::InvalidKeyComponent(format!(
            "asset id {asset_id:?} contains {bad:?}"
        )));
    }
    Ok(())
}

/// Encode `asset_id ++ channel ++ timestamp`.
pub fn encode(asset_id: &str, channel: &str, timestamp: &Timestamp) -> StateResult<String> {
    let channel: ChannelCode = channel.parse()?;
    Ok(RecordKey::new(asset_id, channel, *timestamp)?.encode())
}

/// Encode the scan prefix `asset_id ++ channel`.
pub fn prefix(asset_id: &str, channel: &str) -> StateResult<String> {
    validate_asset_id(asset_id)?;
    let channel: ChannelCode = channel.parse()?;
    Ok(format!("{asset_id}{channel}"))
}

/// Decode a full key whose asset id is `asset_id_len` bytes long.
pub fn decode(key: &str, asset_id_len: usize) -> StateResult<RecordKey> {
    let asset_id = key.get(..asset_id_len).ok_or_else(|| {
        StateError::InvalidKeyComponent(format!(
            "key {key:?} is shorter than asset id length {asset_id_len}"
        ))
    })?;
    let channel_end = asset_id_len + CHANNEL_CODE_WIDTH;
    let channel: ChannelCode = key
        .get(asset_id_len..channel_end)
        .ok_or_else(|| {
            StateError::InvalidKeyComponent(format!("key {key:?} has no channel code"))
        })?
        .parse()?;
    let timestamp = decode_suffix(key, channel_end)?;
    RecordKey::new(asset_id, channel, timestamp)
}

/// Decode the timestamp that follows a `prefix_len`-byte prefix.
pub fn decode_suffix(key: &str, prefix_len: usize) -> StateResult<Timestamp> {
    let malformed = |reason: String| StateError::MalformedTimestamp {
        key: key.to_string(),
        reason,
    };
    let suffix = key
        .get(prefix_len..)
        .ok_or_else(|| malformed(format!("prefix length {prefix_len} is past the key")))?;
    Timestamp::parse_compact(suffix).map_err(malformed)
}

/// First pair `(shorter, longer)` where `shorter` is a proper prefix of
/// `longer`, if any. Keys of such assets can collide in a prefix scan.
pub fn check_prefix_free<'a, I>(asset_ids: I) -> Option<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<&str> = asset_ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    // In sorted order anything starting with `a` directly follows `a`.
    ids.windows(2)
        .find(|pair| pair[1].starts_with(pair[0]))
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
}
