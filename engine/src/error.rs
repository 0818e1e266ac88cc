use plenum_store::StoreError;
use std::fmt;
use thiserror::Error;

/// Machine-readable codes for business-rule violations, distinct from
/// generic validation errors so calling layers can render precise
/// messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    /// A member tried to delegate to themselves.
    ProxySelfForbidden,
    /// The delegation would create a chain (the receiver has delegated
    /// out, or the giver already holds proxies).
    ProxyChainForbidden,
    /// The receiver already holds the maximum number of proxies.
    ProxyCapReached,
}

impl RuleCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProxySelfForbidden => "proxy_self_forbidden",
            Self::ProxyChainForbidden => "proxy_chain_forbidden",
            Self::ProxyCapReached => "proxy_cap_reached",
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Referenced motion, meeting, member, or policy does not exist or is
    /// outside the caller's tenant. Always fatal to the operation.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed identifiers or policy values. Rejected before any
    /// computation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A business rule rejected the operation. The enclosing transaction,
    /// if any, was rolled back.
    #[error("rule violation ({code}): {message}")]
    Rule { code: RuleCode, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn rule(code: RuleCode, message: impl Into<String>) -> Self {
        Self::Rule {
            code,
            message: message.into(),
        }
    }

    /// The rule code, when this is a business-rule violation.
    pub fn rule_code(&self) -> Option<RuleCode> {
        match self {
            Self::Rule { code, .. } => Some(*code),
            _ => None,
        }
    }
}
