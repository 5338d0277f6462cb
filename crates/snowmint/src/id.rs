use core::fmt;
use core::time::Duration;

/// How far ahead of the wall clock an embedded timestamp may sit before
/// [`SnowflakeId::is_plausible_at`] rejects the ID. Catches well-formed IDs
/// minted against a different epoch or a badly skewed clock.
pub const MAX_FUTURE_DRIFT: Duration = Duration::from_secs(60);

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved (always 0, keeps the value positive as an `i64`)
/// - 41 bits timestamp (ms since [`CUSTOM_EPOCH`])
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             62            22 21            17 16        12 11             0
///              +--------------+----------------+----------------+------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter (5) | worker (5) | sequence (12) |
///              +--------------+----------------+----------------+------------+---------------+
///              |<----------------- MSB ---------- 64 bits ---------- LSB ------------------->|
/// ```
///
/// [`CUSTOM_EPOCH`]: crate::CUSTOM_EPOCH
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for extracting the 5-bit datacenter ID field. Occupies bits 17
    /// through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 5-bit worker ID field. Occupies bits 12
    /// through 16.
    pub const WORKER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the datacenter ID to its position (bit 17).
    pub const DATACENTER_ID_SHIFT: u64 = 17;

    /// Number of bits to shift the worker ID to its position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    pub const fn from(timestamp: u64, datacenter_id: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Constructs a new Snowflake ID from its components.
    pub fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(
            datacenter_id <= Self::DATACENTER_ID_MASK,
            "datacenter_id overflow"
        );
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, datacenter_id, worker_id, sequence)
    }

    /// Converts a raw `u64` into this type without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw packed representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp (ms since the epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID from the packed ID.
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum representable timestamp value.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum representable datacenter ID.
    pub const fn max_datacenter_id() -> u64 {
        Self::DATACENTER_ID_MASK
    }

    /// Returns the maximum representable worker ID.
    pub const fn max_worker_id() -> u64 {
        Self::WORKER_ID_MASK
    }

    /// Returns the maximum representable sequence value.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns true if the current sequence value can be incremented without
    /// wrapping.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the next sequence value.
    pub const fn next_sequence(&self) -> u64 {
        self.sequence() + 1
    }

    /// Returns true if the reserved sign bit is clear.
    ///
    /// Raw values with the top bit set decode as negative `i64`s and were
    /// never issued by this scheme.
    pub const fn is_valid(&self) -> bool {
        self.id >> 63 == 0
    }

    /// Structural plausibility check against a clock reading (ms since the
    /// epoch).
    ///
    /// Accepts the ID only if it is positive, the reserved bit is clear, and
    /// the embedded timestamp is no more than [`MAX_FUTURE_DRIFT`] ahead of
    /// `now_ms`. This is a plausibility check, not a proof of issuance: a
    /// well-formed ID that was never minted still passes.
    pub fn is_plausible_at(&self, now_ms: u64) -> bool {
        if self.id == 0 || !self.is_valid() {
            return false;
        }
        self.timestamp() <= now_ms.saturating_add(MAX_FUTURE_DRIFT.as_millis() as u64)
    }

    /// Returns the ID as a zero-padded 20-digit string, so lexicographic
    /// order matches numeric order.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
