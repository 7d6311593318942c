use std::env;
use tracing::warn;

/// Which backend holds the authoritative appointment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Supabase,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub store_backend: StoreBackend,
    pub server_port: u16,
    /// Clinic clock, minutes east of UTC. Hosted settings may override it.
    pub clinic_utc_offset_minutes: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            store_backend: StoreBackend::Memory,
            server_port: 3000,
            clinic_utc_offset_minutes: 0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            store_backend: match env::var("APPOINTMENT_STORE").as_deref() {
                Ok("supabase") => StoreBackend::Supabase,
                Ok("memory") => StoreBackend::Memory,
                Ok(other) => {
                    warn!("Unknown APPOINTMENT_STORE '{}', using in-memory store", other);
                    StoreBackend::Memory
                }
                Err(_) => StoreBackend::Memory,
            },
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or_else(|| {
                    warn!("SERVER_PORT not set or invalid, using default 3000");
                    3000
                }),
            clinic_utc_offset_minutes: match env::var("CLINIC_UTC_OFFSET_MINUTES") {
                Ok(value) => value.parse().unwrap_or_else(|_| {
                    warn!("CLINIC_UTC_OFFSET_MINUTES '{}' is not a number, using UTC", value);
                    0
                }),
                Err(_) => 0,
            },
        };

        if config.store_backend == StoreBackend::Supabase && !config.is_configured() {
            warn!("Supabase store selected but SUPABASE_URL / SUPABASE_ANON_PUBLIC_KEY are missing");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    /// Test helper: a config pointing the hosted backend at `url`.
    pub fn for_supabase(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            supabase_anon_key: anon_key.into(),
            store_backend: StoreBackend::Supabase,
            ..Self::default()
        }
    }
}
