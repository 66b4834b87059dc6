//! # ChumHum Contracts
//!
//! Static knowledge about the ChumHum contract families the scenario DSL
//! drives: function signatures, error code tables, and lookups resolving a
//! family's deployed instance from the world.
//!
//! - [`kinds`] - one marker type per family implementing [`kinds::ContractKind`]
//! - [`reporter`] - error and failure info tables
//! - [`lookup`] - `get_comptroller`, `get_bum_controller_impl`, ...

pub mod kinds;
pub mod lookup;
pub mod reporter;
