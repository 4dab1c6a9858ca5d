//! # Registry Repository
//!
//! The contract every registry store implements.
//!
//! Implementors only provide whole-registry [`load`](RegistryRepository::load) and
//! [`save`](RegistryRepository::save). Edits are built on top of them as one full load
//! followed by one full save, so a store never persists a partial registry.

use std::str::FromStr;

use crate::error::{RegistryError, StoreError};
use crate::fleet::registry::Registry;
use crate::fleet::target::Target;

pub trait RegistryRepository: Send + Sync {
    /// Reads the complete persisted registry.
    fn load(&self) -> Result<Registry, StoreError>;

    /// Replaces the persisted registry with `registry`.
    fn save(&self, registry: &Registry) -> Result<(), StoreError>;

    /// Parses `user:pass@ip` and registers the result.
    fn add(&self, spec: &str) -> Result<Target, RegistryError> {
        let target = Target::from_str(spec)?;
        self.insert(target.clone())?;
        Ok(target)
    }

    /// Registers `target`, refusing a second target with the same IP.
    fn insert(&self, target: Target) -> Result<(), RegistryError> {
        let mut registry = self.load()?;
        if registry.contains_ip(&target.ip) {
            return Err(RegistryError::DuplicateTarget { ip: target.ip });
        }
        registry.push(target);
        self.save(&registry)?;
        Ok(())
    }

    /// Unregisters the first target with the given IP.
    fn remove(&self, ip: &str) -> Result<Target, RegistryError> {
        let mut registry = self.load()?;
        let removed = registry
            .remove_first(ip)
            .ok_or_else(|| RegistryError::TargetNotFound { ip: ip.to_string() })?;
        self.save(&registry)?;
        Ok(removed)
    }
}
