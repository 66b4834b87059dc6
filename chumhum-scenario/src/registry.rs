use chumhum_core::registry::Registry;

use crate::event::{
  process_bum_controller_event, process_bum_controller_impl_event, process_bum_event,
  process_bum_unitroller_event, process_bum_vault_event, process_bum_vault_impl_event,
  process_bum_vault_proxy_event, process_chum_event, process_comptroller_event,
  process_maximillion_event,
};
use crate::value::{
  get_bum_controller_impl_value, get_bum_controller_value, get_bum_unitroller_value,
  get_bum_value, get_bum_vault_impl_value, get_bum_vault_proxy_value, get_bum_vault_value,
  get_chum_value, get_comptroller_value, get_maximillion_value,
};

/// Every ChumHum contract family, for both values and events.
#[must_use]
pub fn registry() -> Registry {
  Registry::default()
    .with_values("BUM", get_bum_value)
    .with_values("CHUM", get_chum_value)
    .with_values("Comptroller", get_comptroller_value)
    .with_values("BUMController", get_bum_controller_value)
    .with_values("BUMControllerImpl", get_bum_controller_impl_value)
    .with_values("BUMUnitroller", get_bum_unitroller_value)
    .with_values("BUMVault", get_bum_vault_value)
    .with_values("BUMVaultImpl", get_bum_vault_impl_value)
    .with_values("BUMVaultProxy", get_bum_vault_proxy_value)
    .with_values("Maximillion", get_maximillion_value)
    .with_events("BUM", process_bum_event)
    .with_events("CHUM", process_chum_event)
    .with_events("Comptroller", process_comptroller_event)
    .with_events("BUMController", process_bum_controller_event)
    .with_events("BUMControllerImpl", process_bum_controller_impl_event)
    .with_events("BUMUnitroller", process_bum_unitroller_event)
    .with_events("BUMVault", process_bum_vault_event)
    .with_events("BUMVaultImpl", process_bum_vault_impl_event)
    .with_events("BUMVaultProxy", process_bum_vault_proxy_event)
    .with_events("Maximillion", process_maximillion_event)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn families_resolve_case_insensitively() {
    let registry = registry();
    assert!(registry.event("bumvaultproxy").is_some());
    assert!(registry.value("chum").is_some());
    assert!(registry.event("CToken").is_none());
    assert_eq!(registry.event_families().count(), 10);
  }
}
