//! Dashboard configuration and API endpoint URLs.
//!
//! ```yaml
//! api_port: 8000
//! production: true
//! hostname: simrig.local
//! refresh_rate: !Max 20
//! default_sort:
//!   sortBy: time
//!   sortOrder: ASC
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::types::{SortParams, UpdateRate};
use crate::{DashboardError, Result};

const LOCALHOST: &str = "127.0.0.1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// API host used outside production
    pub api_host: String,
    pub api_port: u16,
    pub mock_api_port: u16,
    pub use_mock_api: bool,
    /// In production the API lives on the host that served the dashboard
    pub production: bool,
    pub hostname: Option<String>,
    pub refresh_rate: UpdateRate,
    pub default_sort: SortParams,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_host: LOCALHOST.to_string(),
            api_port: 8000,
            mock_api_port: 8001,
            use_mock_api: false,
            production: false,
            hostname: None,
            refresh_rate: UpdateRate::default(),
            default_sort: SortParams::default(),
        }
    }
}

/// URL scheme for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Ws,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Http => "http",
            Protocol::Ws => "ws",
        })
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading dashboard config");
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::file_error(path.to_path_buf(), e))?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(base_url = %config.base_url(Protocol::Http), "Dashboard config loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.production && self.hostname.as_deref().is_none_or(str::is_empty) {
            return Err(DashboardError::validation("hostname", "required in production"));
        }
        if self.api_port == 0 {
            return Err(DashboardError::validation("api_port", "must be non-zero"));
        }
        Ok(())
    }

    /// Base URL of the API, with trailing slash.
    pub fn base_url(&self, protocol: Protocol) -> String {
        if self.use_mock_api {
            return format!("{protocol}://{LOCALHOST}:{}/", self.mock_api_port);
        }
        let host = match (&self.hostname, self.production) {
            (Some(hostname), true) => hostname.as_str(),
            _ => self.api_host.as_str(),
        };
        format!("{protocol}://{host}:{}/", self.api_port)
    }
}

/// Sim rig API routes used by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Root,
    Latest,
    Stream,
    Drivers,
    ActiveDriver,
    DriverStats(u64),
    Scores,
    StreamLaptimes,
    StreamActiveDriver,
    Controllers,
    ControllerSettings,
    Avatar(u64),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Root => String::new(),
            Endpoint::Latest => "latest".into(),
            Endpoint::Stream => "stream".into(),
            Endpoint::Drivers => "drivers".into(),
            Endpoint::ActiveDriver => "activedriver".into(),
            Endpoint::DriverStats(id) => format!("driverstats/{id}"),
            Endpoint::Scores => "scores".into(),
            Endpoint::StreamLaptimes => "streamlaptimes".into(),
            Endpoint::StreamActiveDriver => "streamactivedriver".into(),
            Endpoint::Controllers => "controllers".into(),
            Endpoint::ControllerSettings => "controllersettings".into(),
            Endpoint::Avatar(id) => format!("avatars/{id}"),
        }
    }

    /// The telemetry stream is a websocket, everything else is plain HTTP
    pub fn protocol(&self) -> Protocol {
        match self {
            Endpoint::Stream => Protocol::Ws,
            _ => Protocol::Http,
        }
    }

    pub fn url(&self, config: &DashboardConfig) -> String {
        format!("{}{}", config.base_url(self.protocol()), self.path())
    }
}
