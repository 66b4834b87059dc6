//! Block explorer verification.

use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::info;

use crate::world::World;

/// Submits contract sources to a block explorer.
#[async_trait]
pub trait Verifier: Send + Sync {
  /// # Errors
  /// The explorer rejected the submission.
  async fn verify(
    &self,
    network: &str,
    api_key: &str,
    model_name: &str,
    contract_name: &str,
    address: Address,
  ) -> Result<()>;
}

/// Verifies `contract_name` deployed at `address` as `model_name`. Local
/// networks have no explorer, so this only logs there.
///
/// # Errors
/// * No verifier configured for a live network
/// * Verification failed
pub async fn verify_contract(
  world: World,
  api_key: &str,
  model_name: &str,
  contract_name: &str,
  address: Address,
) -> Result<World> {
  if world.is_local_network() {
    info!(
      "Politely declining to verify on local network: {}.",
      world.network()
    );
    return Ok(world);
  }
  let verifier = world
    .verifier()
    .ok_or_else(|| anyhow!("no verifier configured for {}", world.network()))?
    .clone();
  verifier
    .verify(world.network(), api_key, model_name, contract_name, address)
    .await?;
  Ok(world.add_action(
    format!("Verified {model_name} as {contract_name} at {address}"),
    None,
  ))
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::config::ScenarioConfig;
  use crate::memory_chain::MemoryChain;
  use crate::registry::Registry;

  type Submission = (String, String, String, String, Address);

  #[derive(Default)]
  struct RecordingVerifier {
    submissions: Mutex<Vec<Submission>>,
  }

  #[async_trait]
  impl Verifier for RecordingVerifier {
    async fn verify(
      &self,
      network: &str,
      api_key: &str,
      model_name: &str,
      contract_name: &str,
      address: Address,
    ) -> Result<()> {
      self.submissions.lock().map_err(|_| anyhow!("poisoned"))?.push((
        network.to_string(),
        api_key.to_string(),
        model_name.to_string(),
        contract_name.to_string(),
        address,
      ));
      Ok(())
    }
  }

  fn world(network: &str) -> Result<World> {
    let config = ScenarioConfig {
      network: network.to_string(),
      ..ScenarioConfig::default()
    };
    World::new(Arc::new(MemoryChain::new()), Registry::default(), &config)
  }

  #[tokio::test]
  async fn local_networks_decline_without_calling_the_verifier() -> Result<()> {
    let verifier = Arc::new(RecordingVerifier::default());
    let world = world("development")?.with_verifier(verifier.clone());
    let world =
      verify_contract(world, "key", "CHUM", "CHUM", Address::with_last_byte(1)).await?;
    assert!(world.actions().is_empty());
    assert!(verifier.submissions.lock().expect("lock").is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn live_networks_submit_to_the_verifier() -> Result<()> {
    let verifier = Arc::new(RecordingVerifier::default());
    let world = world("mainnet")?.with_verifier(verifier.clone());
    let address = Address::with_last_byte(9);
    let world =
      verify_contract(world, "key", "ScenImpl", "BUMControllerScenario", address).await?;

    let submissions = verifier.submissions.lock().expect("lock").clone();
    assert_eq!(
      submissions,
      vec![(
        "mainnet".to_string(),
        "key".to_string(),
        "ScenImpl".to_string(),
        "BUMControllerScenario".to_string(),
        address,
      )]
    );
    assert_eq!(world.actions().len(), 1);
    assert!(world.actions()[0]
      .log
      .starts_with("Verified ScenImpl as BUMControllerScenario"));
    Ok(())
  }

  #[tokio::test]
  async fn live_networks_need_a_verifier() -> Result<()> {
    let err = verify_contract(world("mainnet")?, "key", "CHUM", "CHUM", Address::ZERO)
      .await
      .expect_err("no verifier");
    assert!(err.to_string().contains("no verifier configured for mainnet"));
    Ok(())
  }
}
