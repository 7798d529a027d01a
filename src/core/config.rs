use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default tolerance below which a balance counts as settled.
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.01);

/// Settings shared by the balance and settlement engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Balances within this distance of zero are treated as zero.
    pub tolerance: Decimal,
}

impl EngineConfig {
    pub fn with_tolerance(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}
