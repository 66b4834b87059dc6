use std::sync::Arc;

use anyhow::Result;
use chumhum_core::contract::Abi;
use chumhum_core::invokation::ErrorReporter;

use crate::reporter::{
  BUM_CONTROLLER_ERROR_REPORTER, BUM_VAULT_ERROR_REPORTER,
  COMPTROLLER_ERROR_REPORTER, NO_ERROR_REPORTER,
};

/// A contract family known to the scenario DSL.
pub trait ContractKind {
  /// Family name, as written in scenario lines and contract data.
  const NAME: &'static str;
  /// Human-readable function signatures, scenario-only functions included.
  const SIGNATURES: &'static [&'static str];
  const REPORTER: ErrorReporter;

  /// # Errors
  /// A signature does not parse.
  fn abi() -> Result<Arc<Abi>> {
    Ok(Arc::new(Abi::parse(Self::SIGNATURES)?))
  }
}

macro_rules! contract_kind {
  ($kind:ident, $reporter:expr, [$($sig:literal),* $(,)?]) => {
    pub struct $kind;

    impl ContractKind for $kind {
      const NAME: &'static str = stringify!($kind);
      const SIGNATURES: &'static [&'static str] = &[$($sig),*];
      const REPORTER: ErrorReporter = $reporter;
    }
  };
}

contract_kind!(BUM, NO_ERROR_REPORTER, [
  "name() returns (string)",
  "symbol() returns (string)",
  "decimals() returns (uint8)",
  "totalSupply() returns (uint256)",
  "balanceOf(address) returns (uint256)",
  "allowance(address,address) returns (uint256)",
  "approve(address,uint256) returns (bool)",
  "transfer(address,uint256) returns (bool)",
  "transferFrom(address,address,uint256) returns (bool)",
  "allocateTo(address,uint256)",
  "rely(address)",
  "transferScenario(address[],uint256) returns (bool)",
  "transferFromScenario(address[],uint256) returns (bool)",
]);

contract_kind!(CHUM, NO_ERROR_REPORTER, [
  "name() returns (string)",
  "symbol() returns (string)",
  "decimals() returns (uint8)",
  "totalSupply() returns (uint256)",
  "balanceOf(address) returns (uint256)",
  "allowance(address,address) returns (uint256)",
  "approve(address,uint256) returns (bool)",
  "transfer(address,uint256) returns (bool)",
  "transferFrom(address,address,uint256) returns (bool)",
  "checkpoints(address,uint32) returns (uint32,uint96)",
  "numCheckpoints(address) returns (uint32)",
  "delegate(address)",
  "getCurrentVotes(address) returns (uint96)",
  "getPriorVotes(address,uint256) returns (uint96)",
  "setBlockNumber(uint256)",
  "transferScenario(address[],uint256) returns (bool)",
  "transferFromScenario(address[],uint256) returns (bool)",
]);

contract_kind!(Comptroller, COMPTROLLER_ERROR_REPORTER, [
  "getAccountLiquidity(address) returns (uint256,uint256,uint256)",
  "getHypotheticalAccountLiquidity(address,address,uint256,uint256) returns (uint256,uint256,uint256)",
  "membershipLength(address) returns (uint256)",
  "checkMembership(address,address) returns (bool)",
  "getAssetsIn(address) returns (address[])",
  "admin() returns (address)",
  "pendingAdmin() returns (address)",
  "oracle() returns (address)",
  "maxAssets() returns (uint256)",
  "liquidationIncentiveMantissa() returns (uint256)",
  "closeFactorMantissa() returns (uint256)",
  "getBlockNumber() returns (uint256)",
  "markets(address) returns (bool,uint256)",
  "comptrollerImplementation() returns (address)",
  "_setMaxAssets(uint256) returns (uint256)",
  "_setLiquidationIncentive(uint256) returns (uint256)",
  "_supportMarket(address) returns (uint256)",
  "_setPriceOracle(address) returns (uint256)",
  "_setCollateralFactor(address,uint256) returns (uint256)",
  "_setCloseFactor(uint256) returns (uint256)",
  "_setBUMMintRate(uint256) returns (uint256)",
  "_setChumHumBUMVaultRate(uint256) returns (uint256)",
  "_setBUMController(address) returns (uint256)",
  "_setPendingAdmin(address) returns (uint256)",
  "_acceptAdmin() returns (uint256)",
  "_setProtocolPaused(bool) returns (uint256)",
  "_addChumHumMarkets(address[])",
  "_dropChumHumMarket(address)",
  "_setChumHumRate(uint256)",
  "_setChumHumSpeed(address,uint256)",
  "_setMarketBorrowCaps(address[],uint256[])",
  "_setBorrowCapGuardian(address)",
  "_setTreasuryData(address,address,uint256) returns (uint256)",
  "enterMarkets(address[]) returns (uint256[])",
  "exitMarket(address) returns (uint256)",
  "fastForward(uint256) returns (uint256)",
  "unlist(address)",
  "protocolPaused() returns (bool)",
  "getChumHumMarkets() returns (address[])",
  "refreshChumHumSpeeds()",
  "chumhumRate() returns (uint256)",
  "chumhumAccrued(address) returns (uint256)",
  "chumhumSpeeds(address) returns (uint256)",
  "claimChumHum(address)",
  "mintedBUMs(address) returns (uint256)",
  "borrowCapGuardian() returns (address)",
  "borrowCaps(address) returns (uint256)",
]);

contract_kind!(BUMController, BUM_CONTROLLER_ERROR_REPORTER, [
  "admin() returns (address)",
  "pendingAdmin() returns (address)",
  "_setPendingAdmin(address) returns (uint256)",
  "_acceptAdmin() returns (uint256)",
  "_setComptroller(address) returns (uint256)",
  "mintBUM(uint256) returns (uint256)",
  "repayBUM(uint256) returns (uint256,uint256)",
  "getMintableBUM(address) returns (uint256,uint256)",
  "liquidateBUM(address,uint256,address) returns (uint256,uint256)",
  "_setTreasuryData(address,address,uint256) returns (uint256)",
  "initialize()",
]);

contract_kind!(BUMControllerImpl, BUM_CONTROLLER_ERROR_REPORTER, [
  "_become(address)",
]);

contract_kind!(BUMUnitroller, BUM_CONTROLLER_ERROR_REPORTER, [
  "admin() returns (address)",
  "pendingAdmin() returns (address)",
  "_acceptAdmin() returns (uint256)",
  "_setPendingAdmin(address) returns (uint256)",
  "_setPendingImplementation(address) returns (uint256)",
  "bumcontrollerImplementation() returns (address)",
  "pendingBUMControllerImplementation() returns (address)",
]);

contract_kind!(BUMVault, BUM_VAULT_ERROR_REPORTER, [
  "admin() returns (address)",
  "pendingAdmin() returns (address)",
  "_setPendingAdmin(address) returns (uint256)",
  "_acceptAdmin() returns (uint256)",
]);

contract_kind!(BUMVaultImpl, BUM_VAULT_ERROR_REPORTER, [
  "_become(address)",
]);

contract_kind!(BUMVaultProxy, BUM_VAULT_ERROR_REPORTER, [
  "admin() returns (address)",
  "pendingAdmin() returns (address)",
  "_acceptAdmin() returns (uint256)",
  "_setPendingAdmin(address) returns (uint256)",
  "_setPendingImplementation(address) returns (uint256)",
  "bumvaultImplementation() returns (address)",
  "pendingBUMVaultImplementation() returns (address)",
]);

contract_kind!(Maximillion, NO_ERROR_REPORTER, [
  "cMatic() returns (address)",
  "repayBehalf(address)",
  "repayBehalfExplicit(address,address)",
]);

contract_kind!(CToken, NO_ERROR_REPORTER, [
  "name() returns (string)",
  "symbol() returns (string)",
  "decimals() returns (uint8)",
  "balanceOf(address) returns (uint256)",
  "comptroller() returns (address)",
]);

#[cfg(test)]
mod tests {
  use super::*;

  fn parses<K: ContractKind>() -> Result<()> {
    let abi = K::abi()?;
    assert_eq!(abi.functions().len(), K::SIGNATURES.len(), "{}", K::NAME);
    Ok(())
  }

  #[test]
  fn every_signature_table_parses() -> Result<()> {
    parses::<BUM>()?;
    parses::<CHUM>()?;
    parses::<Comptroller>()?;
    parses::<BUMController>()?;
    parses::<BUMControllerImpl>()?;
    parses::<BUMUnitroller>()?;
    parses::<BUMVault>()?;
    parses::<BUMVaultImpl>()?;
    parses::<BUMVaultProxy>()?;
    parses::<Maximillion>()?;
    parses::<CToken>()?;
    Ok(())
  }

  #[test]
  fn names_match_types() {
    assert_eq!(BUMVaultProxy::NAME, "BUMVaultProxy");
    assert_eq!(Comptroller::REPORTER.family, "Comptroller");
  }
}
