//! Command-line flags that sit on top of the file and environment layers.

use std::path::PathBuf;

use evcharge_core::Config;

/// Global flags shared by every subcommand.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Backend API base URL (e.g. `https://ev.example/api`)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Notification hub URL
    #[arg(long, global = true)]
    pub hub_url: Option<String>,

    /// Directory holding the session and cache
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter (e.g. `debug`, `evcharge_client=trace`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Request timeout in seconds (connect, read and write each)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Do not open the realtime notification stream
    #[arg(long, global = true)]
    pub no_hub: bool,
}

impl GlobalArgs {
    /// Apply the flags that were given; absent flags keep the lower layers.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url.clone_from(url);
        }
        if let Some(url) = &self.hub_url {
            config.hub.url.clone_from(url);
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level.clone_from(level);
        }
        if let Some(secs) = self.timeout {
            config.api.connect_timeout_secs = secs;
            config.api.read_timeout_secs = secs;
            config.api.write_timeout_secs = secs;
        }
        if self.no_hub {
            config.hub.enabled = false;
        }
    }
}
