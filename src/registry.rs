use crate::Snowflake;
use crate::clock::{Clock, SystemClock};
use crate::configuration::DEFAULT_NAME;
use crate::error::Error;
use crate::provider::{ConfigurationProvider, DefaultConfigurationProvider, SnowflakeOptions};
use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard},
};
use tracing::debug;

/// Hands out one shared [`Snowflake`] per name.
///
/// Generators are built lazily from the [`ConfigurationProvider`] on first
/// use and live as long as the registry. Concurrent first callers for the
/// same name all receive the same instance, and the provider is consulted
/// once.
///
/// ```
/// use snowflake_registry::{SnowflakeRegistry, SnowflakeOptions, SnowflakeConfiguration};
/// use std::sync::Arc;
///
/// let options = SnowflakeOptions::default()
///     .configure("orders", SnowflakeConfiguration::new("orders").with_ids(1, 2));
/// let registry = SnowflakeRegistry::from_options(options);
///
/// let orders = registry.get("orders").unwrap();
/// assert!(Arc::ptr_eq(&orders, &registry.get("orders").unwrap()));
/// let id = orders.next_id().unwrap();
/// assert_eq!(orders.decompose(id).worker_id, 2);
/// ```
pub struct SnowflakeRegistry<P = DefaultConfigurationProvider> {
    provider: P,
    clock: Arc<dyn Clock>,
    pub(crate) snowflakes: RwLock<HashMap<String, Arc<Snowflake>>>,
    /// Serializes construction so a name is built at most once.
    sync: Mutex<()>,
}

impl SnowflakeRegistry<DefaultConfigurationProvider> {
    pub fn from_options(options: SnowflakeOptions) -> Self {
        Self::new(DefaultConfigurationProvider::new(options))
    }
}

impl Default for SnowflakeRegistry<DefaultConfigurationProvider> {
    fn default() -> Self {
        Self::new(DefaultConfigurationProvider::default())
    }
}

impl<P> SnowflakeRegistry<P>
where
    P: ConfigurationProvider,
{
    pub fn new(provider: P) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock))
    }

    /// Every generator built by this registry reads `clock`.
    pub fn with_clock(provider: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            snowflakes: RwLock::new(HashMap::new()),
            sync: Mutex::new(()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get or create the snowflake called `name`.
    pub fn get(&self, name: &str) -> Result<Arc<Snowflake>, Error> {
        check_name(name)?;

        if let Some(snowflake) = self.lookup(name)? {
            return Ok(snowflake);
        }

        let _guard = self.sync.lock().map_err(|_| Error::MutexPoisoned)?;
        if let Some(snowflake) = self.lookup(name)? {
            return Ok(snowflake);
        }

        let snowflake = self.create(name)?;
        self.publish(name, snowflake)
    }

    /// Get the snowflake called [`DEFAULT_NAME`].
    pub fn get_default(&self) -> Result<Arc<Snowflake>, Error> {
        self.get(DEFAULT_NAME)
    }

    /// Publish an already built snowflake under its own name.
    ///
    /// Fails with [`Error::RegistrationConflict`] if the name is taken.
    pub fn register(&self, snowflake: Snowflake) -> Result<Arc<Snowflake>, Error> {
        check_name(snowflake.name())?;

        let _guard = self.sync.lock().map_err(|_| Error::MutexPoisoned)?;
        let mut snowflakes = self.snowflakes.write().map_err(|_| Error::MutexPoisoned)?;
        match snowflakes.entry(snowflake.name().to_string()) {
            Entry::Occupied(entry) => Err(Error::RegistrationConflict(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(name = entry.key().as_str(), "registered snowflake");
                Ok(entry.insert(Arc::new(snowflake)).clone())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read_map().contains_key(name)
    }

    /// Names of the snowflakes built so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_map().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read access for inspection. The map is only mutated by single
    /// inserts, so a poisoned guard still holds a consistent map.
    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Snowflake>>> {
        self.snowflakes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, name: &str) -> Result<Option<Arc<Snowflake>>, Error> {
        let snowflakes = self.snowflakes.read().map_err(|_| Error::MutexPoisoned)?;
        Ok(snowflakes.get(name).cloned())
    }

    /// Create snowflake by name.
    fn create(&self, name: &str) -> Result<Snowflake, Error> {
        let mut configuration = self
            .provider
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        configuration.name = name.to_string();

        let snowflake = Snowflake::with_clock(configuration, self.clock.clone())?;
        debug!(
            name,
            datacenter_id = snowflake.configuration().datacenter_id,
            worker_id = snowflake.configuration().worker_id,
            "created snowflake"
        );
        Ok(snowflake)
    }

    fn publish(&self, name: &str, snowflake: Snowflake) -> Result<Arc<Snowflake>, Error> {
        let mut snowflakes = self.snowflakes.write().map_err(|_| Error::MutexPoisoned)?;
        match snowflakes.entry(name.to_string()) {
            Entry::Vacant(entry) => Ok(entry.insert(Arc::new(snowflake)).clone()),
            // unreachable while construction holds `sync`
            Entry::Occupied(entry) => {
                debug!(name, "snowflake already published, discarding duplicate");
                Ok(entry.get().clone())
            }
        }
    }
}

fn check_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "snowflake name must not be empty or whitespace".to_string(),
        ));
    }
    Ok(())
}
