use crate::builder::Builder;
use crate::clock::{Clock, SystemClock};
use crate::configuration::SnowflakeConfiguration;
use crate::error::*;
use std::{
    fmt,
    hint,
    sync::{Arc, Mutex},
};
use tracing::{instrument, trace, warn};

/// Internals of Snowflake.
/// This struct is not exposed to the public.
#[derive(Debug)]
pub(crate) struct Internals {
    /// Last issued timestamp relative to the epoch, -1 before the first id.
    pub(crate) last_timestamp: i64,
    pub(crate) sequence: u64,
}

/// SharedSnowflake is shared between Snowflake instances.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake {
    pub(crate) configuration: SnowflakeConfiguration,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) internals: Mutex<Internals>,
}

/// Snowflake is a distributed unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads.
pub struct Snowflake(pub(crate) Arc<SharedSnowflake>);

impl Snowflake {
    /// Create a new Snowflake with the default configuration.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new() -> Result<Self, Error> {
        Builder::new().finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Create a Snowflake reading the system clock.
    pub fn from_configuration(configuration: SnowflakeConfiguration) -> Result<Self, Error> {
        Self::with_clock(configuration, Arc::new(SystemClock))
    }

    /// Create a Snowflake reading the given clock.
    ///
    /// The configuration is validated once here; an invalid layout or an
    /// epoch later than the clock's current time fails with
    /// [`Error::InvalidConfiguration`].
    pub fn with_clock(
        configuration: SnowflakeConfiguration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        configuration.validate()?;

        let now = clock.now_millis();
        if configuration.epoch > now {
            return Err(Error::InvalidConfiguration(format!(
                "epoch {} is ahead of current time {}",
                configuration.epoch, now
            )));
        }

        Ok(Self::new_inner(Arc::new(SharedSnowflake {
            configuration,
            clock,
            internals: Mutex::new(Internals {
                last_timestamp: -1,
                sequence: 0,
            }),
        })))
    }

    pub(crate) fn new_inner(shared: Arc<SharedSnowflake>) -> Self {
        Self(shared)
    }

    pub fn name(&self) -> &str {
        &self.0.configuration.name
    }

    pub fn configuration(&self) -> &SnowflakeConfiguration {
        &self.0.configuration
    }

    /// Generate the next unique id.
    ///
    /// When the sequence is exhausted within one millisecond the calling
    /// thread spins until the clock ticks over, which takes at most about a
    /// millisecond on a healthy clock. A clock that reads earlier than the
    /// last issued timestamp fails with [`Error::ClockMovedBackward`] and
    /// leaves the generator state untouched.
    #[instrument(level = "trace", skip(self), fields(name = %self.0.configuration.name))]
    pub fn next_id(&self) -> Result<u64, Error> {
        let configuration = &self.0.configuration;
        let mut internals = self.0.internals.lock().map_err(|_| Error::MutexPoisoned)?;

        let last = internals.last_timestamp;
        let current = self.elapsed();
        if current < 0 {
            warn!(epoch = configuration.epoch, current, "clock is behind the epoch");
            return Err(Error::ClockMovedBackward(last.max(0) - current));
        }
        if current < last {
            warn!(last, current, "clock moved backwards");
            return Err(Error::ClockMovedBackward(last - current));
        }

        let (timestamp, sequence) = if current == last {
            let sequence = (internals.sequence + 1) & configuration.max_sequence();
            if sequence == 0 {
                trace!(last, "sequence exhausted, waiting for the next millisecond");
                (self.til_next_millis(last), 0)
            } else {
                (current, sequence)
            }
        } else {
            (current, 0)
        };

        // non-negative: checked above and the spin only moves forward
        let timestamp_delta = timestamp as u64;
        if timestamp_delta > configuration.max_timestamp() {
            return Err(Error::OverTimeLimit);
        }

        internals.last_timestamp = timestamp;
        internals.sequence = sequence;

        Ok(compose(configuration, timestamp_delta, sequence))
    }

    /// Break an id minted by this generator up into its parts.
    pub fn decompose(&self, id: u64) -> DecomposedSnowflake {
        decompose(id, &self.0.configuration)
    }

    /// Milliseconds since the configured epoch.
    #[inline]
    fn elapsed(&self) -> i64 {
        self.0.clock.now_millis() - self.0.configuration.epoch
    }

    /// Busy-wait until the clock passes `last`.
    fn til_next_millis(&self, last: i64) -> i64 {
        loop {
            let current = self.elapsed();
            if current > last {
                return current;
            }
            hint::spin_loop();
        }
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl Clone for Snowflake {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl fmt::Debug for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snowflake")
            .field("configuration", &self.0.configuration)
            .finish_non_exhaustive()
    }
}

#[inline]
fn compose(configuration: &SnowflakeConfiguration, timestamp: u64, sequence: u64) -> u64 {
    (timestamp << configuration.timestamp_shift())
        | (configuration.datacenter_id << configuration.datacenter_id_shift())
        | (configuration.worker_id << configuration.worker_id_shift())
        | sequence
}

/// DecomposedSnowflake is the parts of a Snowflake ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedSnowflake {
    pub id: u64,
    pub msb: u64,
    /// Milliseconds since the generator's epoch.
    pub time: u64,
    pub datacenter_id: u64,
    pub worker_id: u64,
    pub sequence: u64,
}

impl DecomposedSnowflake {
    /// Break a Snowflake ID up into its parts using the layout that produced it.
    pub fn decompose(id: u64, configuration: &SnowflakeConfiguration) -> Self {
        decompose(id, configuration)
    }
}

/// Break a Snowflake ID up into its parts.
///
/// Never panics, even for a configuration that would fail validation: fields
/// shifted out past bit 63 decode as zero.
pub fn decompose(id: u64, configuration: &SnowflakeConfiguration) -> DecomposedSnowflake {
    let field = |shift: u32, mask: u64| id.checked_shr(shift).unwrap_or(0) & mask;
    DecomposedSnowflake {
        id,
        msb: id >> 63,
        time: field(configuration.timestamp_shift(), configuration.max_timestamp()),
        datacenter_id: field(
            configuration.datacenter_id_shift(),
            configuration.max_datacenter_id(),
        ),
        worker_id: field(configuration.worker_id_shift(), configuration.max_worker_id()),
        sequence: id & configuration.max_sequence(),
    }
}
