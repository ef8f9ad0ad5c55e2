//! Capabilities and permission providers.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Capabilities consulted when computing the safe-extension list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Access to the mailing component.
    AccessMailing,
    /// Full administration.
    Administer,
    /// Creating mailings (only relevant with the mailing workflow enabled).
    CreateMailings,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::AccessMailing => write!(f, "access-mailing"),
            Capability::Administer => write!(f, "administer"),
            Capability::CreateMailings => write!(f, "create-mailings"),
        }
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "access-mailing" => Ok(Capability::AccessMailing),
            "administer" => Ok(Capability::Administer),
            "create-mailings" => Ok(Capability::CreateMailings),
            _ => Err(format!("Unknown capability: {}", s)),
        }
    }
}

/// Answers capability checks for the current caller.
pub trait PermissionProvider {
    fn has(&self, capability: Capability) -> bool;
}

/// A caller without any capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapabilities;

impl PermissionProvider for NoCapabilities {
    fn has(&self, _capability: Capability) -> bool {
        false
    }
}

/// A fixed set of granted capabilities.
#[derive(Debug, Clone, Default)]
pub struct GrantedCapabilities(HashSet<Capability>);

impl GrantedCapabilities {
    pub fn new<I: IntoIterator<Item = Capability>>(capabilities: I) -> Self {
        Self(capabilities.into_iter().collect())
    }
}

impl PermissionProvider for GrantedCapabilities {
    fn has(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }
}
