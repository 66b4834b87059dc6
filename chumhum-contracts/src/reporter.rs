//! Error and failure info tables.
//!
//! Positions match the `Error` and `FailureInfo` enums compiled into each
//! contract, so a returned code indexes straight into its table.

use chumhum_core::invokation::ErrorReporter;

pub use chumhum_core::invokation::NO_ERROR_REPORTER;

pub const COMPTROLLER_ERROR_REPORTER: ErrorReporter = ErrorReporter {
  family: "Comptroller",
  errors: &[
    "NO_ERROR",
    "UNAUTHORIZED",
    "COMPTROLLER_MISMATCH",
    "INSUFFICIENT_SHORTFALL",
    "INSUFFICIENT_LIQUIDITY",
    "INVALID_CLOSE_FACTOR",
    "INVALID_COLLATERAL_FACTOR",
    "INVALID_LIQUIDATION_INCENTIVE",
    "MARKET_NOT_ENTERED",
    "MARKET_NOT_LISTED",
    "MARKET_ALREADY_LISTED",
    "MATH_ERROR",
    "NONZERO_BORROW_BALANCE",
    "PRICE_ERROR",
    "REJECTION",
    "SNAPSHOT_ERROR",
    "TOO_MANY_ASSETS",
    "TOO_MUCH_REPAY",
    "INSUFFICIENT_BALANCE_FOR_BUM",
    "MARKET_NOT_COLLATERAL",
  ],
  infos: &[
    "ACCEPT_ADMIN_PENDING_ADMIN_CHECK",
    "ACCEPT_PENDING_IMPLEMENTATION_ADDRESS_CHECK",
    "EXIT_MARKET_BALANCE_OWED",
    "EXIT_MARKET_REJECTION",
    "SET_CLOSE_FACTOR_OWNER_CHECK",
    "SET_CLOSE_FACTOR_VALIDATION",
    "SET_COLLATERAL_FACTOR_OWNER_CHECK",
    "SET_COLLATERAL_FACTOR_NO_EXISTS",
    "SET_COLLATERAL_FACTOR_VALIDATION",
    "SET_COLLATERAL_FACTOR_WITHOUT_PRICE",
    "SET_IMPLEMENTATION_OWNER_CHECK",
    "SET_LIQUIDATION_INCENTIVE_OWNER_CHECK",
    "SET_LIQUIDATION_INCENTIVE_VALIDATION",
    "SET_MAX_ASSETS_OWNER_CHECK",
    "SET_PENDING_ADMIN_OWNER_CHECK",
    "SET_PENDING_IMPLEMENTATION_OWNER_CHECK",
    "SET_PRICE_ORACLE_OWNER_CHECK",
    "SUPPORT_MARKET_EXISTS",
    "SUPPORT_MARKET_OWNER_CHECK",
    "SET_PAUSE_GUARDIAN_OWNER_CHECK",
    "SET_BUM_MINT_RATE_CHECK",
    "SET_BUMCONTROLLER_OWNER_CHECK",
    "SET_MINTED_BUM_REJECTION",
    "SET_TREASURY_OWNER_CHECK",
  ],
};

pub const BUM_CONTROLLER_ERROR_REPORTER: ErrorReporter = ErrorReporter {
  family: "BUMController",
  errors: &[
    "NO_ERROR",
    "UNAUTHORIZED",
    "REJECTION",
    "SNAPSHOT_ERROR",
    "PRICE_ERROR",
    "MATH_ERROR",
    "INSUFFICIENT_BALANCE_FOR_BUM",
  ],
  infos: &[
    "SET_PENDING_ADMIN_OWNER_CHECK",
    "SET_PENDING_IMPLEMENTATION_OWNER_CHECK",
    "SET_COMPTROLLER_OWNER_CHECK",
    "ACCEPT_ADMIN_PENDING_ADMIN_CHECK",
    "ACCEPT_PENDING_IMPLEMENTATION_ADDRESS_CHECK",
    "BUM_MINT_REJECTION",
    "BUM_BURN_REJECTION",
    "BUM_LIQUIDATE_ACCRUE_BORROW_INTEREST_FAILED",
    "BUM_LIQUIDATE_ACCRUE_COLLATERAL_INTEREST_FAILED",
    "BUM_LIQUIDATE_COLLATERAL_FRESHNESS_CHECK",
    "BUM_LIQUIDATE_COMPTROLLER_REJECTION",
    "BUM_LIQUIDATE_COMPTROLLER_CALCULATE_AMOUNT_SEIZE_FAILED",
    "BUM_LIQUIDATE_CLOSE_AMOUNT_IS_UINT_MAX",
    "BUM_LIQUIDATE_CLOSE_AMOUNT_IS_ZERO",
    "BUM_LIQUIDATE_FRESHNESS_CHECK",
    "BUM_LIQUIDATE_LIQUIDATOR_IS_BORROWER",
    "BUM_LIQUIDATE_REPAY_BORROW_FRESH_FAILED",
    "BUM_LIQUIDATE_SEIZE_BALANCE_INCREMENT_FAILED",
    "BUM_LIQUIDATE_SEIZE_BALANCE_DECREMENT_FAILED",
    "BUM_LIQUIDATE_SEIZE_LIQUIDATOR_IS_BORROWER",
    "BUM_LIQUIDATE_SEIZE_TOO_MUCH",
    "MINT_FEE_CALCULATION_FAILED",
    "SET_TREASURY_OWNER_CHECK",
  ],
};

pub const BUM_VAULT_ERROR_REPORTER: ErrorReporter = ErrorReporter {
  family: "BUMVault",
  errors: &["NO_ERROR", "UNAUTHORIZED"],
  infos: &[
    "ACCEPT_ADMIN_PENDING_ADMIN_CHECK",
    "ACCEPT_PENDING_IMPLEMENTATION_ADDRESS_CHECK",
    "SET_PENDING_ADMIN_OWNER_CHECK",
    "SET_PENDING_IMPLEMENTATION_OWNER_CHECK",
  ],
};

#[cfg(test)]
mod tests {
  use alloy::primitives::U256;

  use super::*;

  #[test]
  fn codes_resolve_by_position() {
    assert_eq!(COMPTROLLER_ERROR_REPORTER.error(U256::from(9)), "MARKET_NOT_LISTED");
    assert_eq!(
      BUM_CONTROLLER_ERROR_REPORTER.info(U256::ZERO),
      "SET_PENDING_ADMIN_OWNER_CHECK"
    );
    assert_eq!(BUM_VAULT_ERROR_REPORTER.error_code("unauthorized"), Some(1));
    assert!(!NO_ERROR_REPORTER.has_codes());
  }
}
