use crate::Snowflake;
use crate::clock::{Clock, SystemClock};
use crate::configuration::*;
use crate::error::Error;
use chrono::prelude::*;
use std::sync::Arc;

/// A builder for building the ['Snowflake'] generator.
///
/// [`Snowflake`]: struct.Snowflake.html
pub struct Builder {
    name: String,
    start_time: Option<DateTime<Utc>>,
    worker_id: u64,
    datacenter_id: u64,
    clock: Option<Arc<dyn Clock>>,
    bit_len_time: u8,
    bit_len_sequence: u8,
    bit_len_data_center_id: u8,
    bit_len_worker_id: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Builder {
    /// Construct a new builder for the build of ['Snowflake'].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            start_time: None,
            worker_id: 0,
            datacenter_id: 0,
            clock: None,
            bit_len_time: DEFAULT_TIMESTAMP_BITS,
            bit_len_sequence: DEFAULT_SEQUENCE_BITS,
            bit_len_data_center_id: DEFAULT_DATACENTER_ID_BITS,
            bit_len_worker_id: DEFAULT_WORKER_ID_BITS,
        }
    }

    /// Set the name reported by the generator.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the start time.
    /// If the time is set later than the current time, 'finalize' will fail.
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set the worker ID.
    pub fn worker_id(mut self, worker_id: u64) -> Self {
        self.worker_id = worker_id;
        self
    }

    /// Set up the data center ID.
    pub fn data_center_id(mut self, data_center_id: u64) -> Self {
        self.datacenter_id = data_center_id;
        self
    }

    /// Read time from `clock` instead of the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the bit length of the timestamp section。
    pub fn bit_len_time(mut self, bit_len_time: u8) -> Self {
        self.bit_len_time = bit_len_time;
        self
    }

    /// Sets the bit length of the serial number section。
    pub fn bit_len_sequence(mut self, bit_len_sequence: u8) -> Self {
        self.bit_len_sequence = bit_len_sequence;
        self
    }

    /// Set the bit length for the Data Center ID section.
    pub fn bit_len_data_center_id(mut self, bit_len_data_center_id: u8) -> Self {
        self.bit_len_data_center_id = bit_len_data_center_id;
        self
    }

    /// Set the bit length of the worker ID section.
    pub fn bit_len_worker_id(mut self, bit_len_worker_id: u8) -> Self {
        self.bit_len_worker_id = bit_len_worker_id;
        self
    }

    /// The configuration this builder describes, without validating it.
    pub fn configuration(&self) -> SnowflakeConfiguration {
        SnowflakeConfiguration {
            name: self.name.clone(),
            epoch: self
                .start_time
                .map_or(DEFAULT_EPOCH, |start_time| start_time.timestamp_millis()),
            timestamp_bits: self.bit_len_time,
            datacenter_id_bits: self.bit_len_data_center_id,
            worker_id_bits: self.bit_len_worker_id,
            sequence_bits: self.bit_len_sequence,
            worker_id: self.worker_id,
            datacenter_id: self.datacenter_id,
        }
    }

    /// Finish building and create a Snowflake instance.
    /// This method will return an error if the start time is in the future or if validation fails.
    pub fn finalize(self) -> Result<Snowflake, Error> {
        let clock: Arc<dyn Clock> = match &self.clock {
            Some(clock) => clock.clone(),
            None => Arc::new(SystemClock),
        };

        if let Some(start_time) = self.start_time
            && start_time.timestamp_millis() > clock.now_millis()
        {
            return Err(Error::StartTimeAheadOfCurrentTime(start_time));
        }

        Snowflake::with_clock(self.configuration(), clock)
    }
}
