//! # ChumHum Scenario
//!
//! Contract families for the ChumHum scenario DSL: deployment builders,
//! event processors and value fetchers for the BUM stablecoin, the CHUM
//! governance token, the Comptroller and the BUM controller and vault
//! proxies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chumhum_core::config::ScenarioConfig;
//! use chumhum_core::memory_chain::MemoryChain;
//! use chumhum_scenario::runner::{new_world, run_script};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let world = new_world(&ScenarioConfig::default(), Arc::new(MemoryChain::new())).await?;
//! let world = run_script(world, "BUM Deploy\nRead BUM Address").await?;
//! println!("{} action(s)", world.actions().len());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod event;
pub mod registry;
pub mod runner;
pub mod value;
