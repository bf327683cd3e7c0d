//! Named, lazily-constructed generators of [Twitter's Snowflake] style ids.
//!
//! An id is a non-negative 64-bit integer laid out, most significant bit
//! first, as `0 | timestamp | data center id | worker id | sequence`. The bit
//! widths, the epoch and the two identity fields come from a
//! [`SnowflakeConfiguration`]; the classic split is 41/5/5/12.
//!
//! ## Quickstart
//!
//! A single generator:
//!
//! ```
//! use snowflake_registry::Snowflake;
//!
//! let sf = Snowflake::builder()
//!     .worker_id(2)
//!     .data_center_id(1)
//!     .finalize()
//!     .unwrap();
//! let next_id = sf.next_id().unwrap();
//! println!("{}", next_id);
//! ```
//!
//! Many named generators, built on first use from a [`ConfigurationProvider`]:
//!
//! ```
//! use snowflake_registry::{SnowflakeOptions, SnowflakeRegistry};
//!
//! let options = SnowflakeOptions::from_json_str(
//!     r#"{ "default": { "worker_id": 1 }, "fallback_to_default": true }"#,
//! )
//! .unwrap();
//! let registry = SnowflakeRegistry::from_options(options);
//!
//! let users = registry.get("users").unwrap();
//! println!("{}", users.next_id().unwrap());
//! println!("{}", registry.get_default().unwrap().next_id().unwrap());
//! ```
//!
//! ## Concurrent use
//!
//! Snowflake is thread safe. `clone` it (or share the `Arc` handed out by
//! the registry) before moving to another thread:
//! ```
//! use snowflake_registry::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::new().unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

mod builder;
mod clock;
mod configuration;
mod error;
mod provider;
mod registry;
mod snowflake;

pub use crate::snowflake::*;
pub use builder::*;
pub use clock::*;
pub use configuration::*;
pub use error::*;
pub use provider::*;
pub use registry::*;
