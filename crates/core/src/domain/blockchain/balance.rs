use super::chain::ChainKind;

/// Result of a single balance lookup before it is collapsed into the number
/// written to the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceOutcome {
    Found(f64),
    /// The chain answered and the wallet holds no such token.
    NotFound,
    /// Connection, request, process or response format failure.
    TransportError,
    Unsupported,
}

impl BalanceOutcome {
    pub fn value(&self) -> f64 {
        match self {
            BalanceOutcome::Found(balance) => *balance,
            _ => 0.0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            BalanceOutcome::TransportError | BalanceOutcome::Unsupported
        )
    }
}

impl From<Option<f64>> for BalanceOutcome {
    fn from(balance: Option<f64>) -> Self {
        match balance {
            Some(balance) => BalanceOutcome::Found(balance),
            None => BalanceOutcome::NotFound,
        }
    }
}

/// A resolved balance along with the strategy used to get it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBalance {
    pub kind: ChainKind,
    pub outcome: BalanceOutcome,
}
