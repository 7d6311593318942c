// libs/appointment-cell/src/services/catalog.rs
use std::collections::HashMap;

use tracing::debug;

use crate::models::{ServiceCatalogEntry, ServiceType, ValidationError, DEFAULT_DURATION_MINUTES};

/// Read-only lookup from service type to default duration and display color.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    entries: HashMap<String, ServiceCatalogEntry>,
}

impl ServiceCatalog {
    pub fn new(entries: Vec<ServiceCatalogEntry>) -> Result<Self, ValidationError> {
        let mut by_id = HashMap::with_capacity(entries.len());
        for entry in entries {
            if entry.default_duration_minutes == 0 {
                return Err(ValidationError::InvalidServiceDuration(entry.id));
            }
            by_id.insert(entry.id.clone(), entry);
        }
        Ok(Self { entries: by_id })
    }

    pub fn entry(&self, service_type: &ServiceType) -> Option<&ServiceCatalogEntry> {
        match service_type {
            ServiceType::Service(id) => self.entries.get(id),
            ServiceType::Blocked => None,
        }
    }

    /// Default duration in minutes, falling back to 15 for unknown types.
    pub fn duration_for(&self, service_type: &ServiceType) -> u32 {
        match self.entry(service_type) {
            Some(entry) => entry.default_duration_minutes,
            None => {
                debug!("No catalog entry for {}, using default duration", service_type);
                DEFAULT_DURATION_MINUTES
            }
        }
    }

    /// Entries ordered by label for display.
    pub fn entries(&self) -> Vec<ServiceCatalogEntry> {
        let mut entries: Vec<ServiceCatalogEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label));
        entries
    }
}
