pub use alloy::dyn_abi::DynSolValue;
pub use alloy::primitives::{Address, U256};
pub use anyhow::Result;

pub use crate::chain::{Chain, LogEntry, Receipt};
pub use crate::command::{
  command_help, fetcher_help, get_fetcher_value, process_command_event, Arg,
  Args, Command, Fetcher,
};
pub use crate::config::ScenarioConfig;
pub use crate::contract::{Abi, Call, Contract};
pub use crate::core_value::{
  get_address_v, get_bool_v, get_core_value, get_event_v, get_exp_number_v,
  get_number_v, get_percent_v, get_string_v, get_value,
};
pub use crate::error::ScenarioError;
pub use crate::event::{parse_event, parse_script, Event};
pub use crate::invokation::{
  deploy, invoke, read, read_address, read_bool, read_number, read_string,
  read_value, Deployed, ErrorReporter, Invokation, InvokationError,
  NO_ERROR_REPORTER,
};
pub use crate::lookup::{
  get_address, get_contract_data, get_contract_data_string, get_world_contract,
  get_world_contract_by_address,
};
pub use crate::memory_chain::{MemoryChain, SendOutcome};
pub use crate::networks::{
  load_networks, merge_contract_abi, save_networks, store_and_save_contract,
  store_contract, ContractIndex,
};
pub use crate::registry::{EventProcessor, Registry, ValueProcessor};
pub use crate::value::{Number, Value};
pub use crate::verify::{verify_contract, Verifier};
pub use crate::world::{Account, Action, World};
