//! # ChumHum Core
//!
//! Engine for the ChumHum scenario DSL: scenario lines are parsed into
//! [`event::Event`]s, matched against [`command::Command`] and
//! [`command::Fetcher`] verbs, and applied to an immutable [`world::World`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chumhum_core::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let world = World::new(
//!     Arc::new(MemoryChain::new()),
//!     Registry::default(),
//!     &ScenarioConfig::default(),
//! )?;
//! let value = get_core_value(world, parse_event("Sum 1 (Exp 0.5)")?).await?;
//! println!("{}", value.show());
//! # Ok(())
//! # }
//! ```
//!
//! Contract families (`BUM`, `Comptroller`, ...) are plugged in through the
//! [`registry::Registry`].

pub mod chain;
pub mod command;
pub mod config;
pub mod contract;
pub mod core_value;
pub mod error;
pub mod event;
pub mod invokation;
pub mod lookup;
pub mod memory_chain;
pub mod networks;
pub mod prelude;
pub mod registry;
pub mod value;
pub mod verify;
pub mod world;
