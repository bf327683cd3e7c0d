use chrono::Utc;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// Generators read the clock once per id (and repeatedly while waiting out
/// an exhausted sequence). Plug in a scripted implementation to drive a
/// generator deterministically in tests.
pub trait Clock: Send + Sync {
    /// Returns the current time in milliseconds since 1970-01-01T00:00:00Z.
    fn now_millis(&self) -> i64;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now_millis(&self) -> i64 {
        self()
    }
}
