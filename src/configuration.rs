use crate::error::Error;
use serde::{Deserialize, Serialize};

/// The reserved name of the default snowflake.
pub const DEFAULT_NAME: &str = "default";

/// Default epoch: 2021-01-01T00:00:00Z in milliseconds.
pub const DEFAULT_EPOCH: i64 = 1_609_459_200_000;

/// bit length of time
pub const DEFAULT_TIMESTAMP_BITS: u8 = 41;
/// bit length of the data center id
pub const DEFAULT_DATACENTER_ID_BITS: u8 = 5;
/// bit length of worker id
pub const DEFAULT_WORKER_ID_BITS: u8 = 5;
/// bit length of sequence number
pub const DEFAULT_SEQUENCE_BITS: u8 = 12;

/// Bits available below the sign bit.
const MAX_TOTAL_BITS: u32 = 63;

/// The bit layout and identity of one snowflake generator.
///
/// Every field has a default, so a serialized configuration only has to
/// carry what differs from the classic 41/5/5/12 split, typically the
/// assigned `worker_id` and `datacenter_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowflakeConfiguration {
    pub name: String,
    /// Milliseconds since the Unix epoch subtracted from every timestamp.
    pub epoch: i64,
    pub timestamp_bits: u8,
    pub datacenter_id_bits: u8,
    pub worker_id_bits: u8,
    pub sequence_bits: u8,
    pub worker_id: u64,
    pub datacenter_id: u64,
}

impl Default for SnowflakeConfiguration {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            epoch: DEFAULT_EPOCH,
            timestamp_bits: DEFAULT_TIMESTAMP_BITS,
            datacenter_id_bits: DEFAULT_DATACENTER_ID_BITS,
            worker_id_bits: DEFAULT_WORKER_ID_BITS,
            sequence_bits: DEFAULT_SEQUENCE_BITS,
            worker_id: 0,
            datacenter_id: 0,
        }
    }
}

impl SnowflakeConfiguration {
    /// A default-layout configuration with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the worker and data center ids.
    pub fn with_ids(mut self, datacenter_id: u64, worker_id: u64) -> Self {
        self.datacenter_id = datacenter_id;
        self.worker_id = worker_id;
        self
    }

    pub fn with_epoch(mut self, epoch: i64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Set all four bit lengths at once.
    pub fn with_bits(
        mut self,
        timestamp_bits: u8,
        datacenter_id_bits: u8,
        worker_id_bits: u8,
        sequence_bits: u8,
    ) -> Self {
        self.timestamp_bits = timestamp_bits;
        self.datacenter_id_bits = datacenter_id_bits;
        self.worker_id_bits = worker_id_bits;
        self.sequence_bits = sequence_bits;
        self
    }

    /// Check the bit-width budget and the id ranges.
    pub fn validate(&self) -> Result<(), Error> {
        if self.epoch < 0 {
            return Err(Error::InvalidConfiguration(format!(
                "epoch {} is before the unix epoch",
                self.epoch
            )));
        }

        if self.timestamp_bits == 0 {
            return Err(Error::InvalidConfiguration(
                "timestamp_bits must be at least 1".to_string(),
            ));
        }

        let total = u32::from(self.timestamp_bits)
            + u32::from(self.datacenter_id_bits)
            + u32::from(self.worker_id_bits)
            + u32::from(self.sequence_bits);
        if total > MAX_TOTAL_BITS {
            return Err(Error::InvalidConfiguration(format!(
                "time({}) + data_center({}) + worker({}) + sequence({}) = {} exceeds {}",
                self.timestamp_bits,
                self.datacenter_id_bits,
                self.worker_id_bits,
                self.sequence_bits,
                total,
                MAX_TOTAL_BITS
            )));
        }

        if self.worker_id > self.max_worker_id() {
            return Err(Error::InvalidConfiguration(format!(
                "worker id {} is greater than the max allowed value {}",
                self.worker_id,
                self.max_worker_id()
            )));
        }

        if self.datacenter_id > self.max_datacenter_id() {
            return Err(Error::InvalidConfiguration(format!(
                "data center id {} is greater than the max allowed value {}",
                self.datacenter_id,
                self.max_datacenter_id()
            )));
        }

        Ok(())
    }

    #[inline]
    pub fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }

    #[inline]
    pub fn max_worker_id(&self) -> u64 {
        mask(self.worker_id_bits)
    }

    #[inline]
    pub fn max_datacenter_id(&self) -> u64 {
        mask(self.datacenter_id_bits)
    }

    /// Largest timestamp delta the layout can hold.
    #[inline]
    pub fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits)
    }

    #[inline]
    pub(crate) fn worker_id_shift(&self) -> u32 {
        u32::from(self.sequence_bits)
    }

    #[inline]
    pub(crate) fn datacenter_id_shift(&self) -> u32 {
        u32::from(self.sequence_bits) + u32::from(self.worker_id_bits)
    }

    #[inline]
    pub(crate) fn timestamp_shift(&self) -> u32 {
        self.datacenter_id_shift() + u32::from(self.datacenter_id_bits)
    }
}

/// Low `bits` set. Callers stay below 64 bits after validation.
#[inline]
fn mask(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
