//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub(crate) const DEFAULT_ENGINE_URL: &str = "http://localhost:9200";
pub(crate) const DEFAULT_LAUNCH_COMMAND: &str = "bin/elasticsearch";

pub(crate) fn default_server_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

pub(crate) fn default_server_port() -> u16 {
    8080
}

pub(crate) fn default_engine_url() -> String {
    DEFAULT_ENGINE_URL.to_string()
}

pub(crate) fn default_engine_timeout_secs() -> u64 {
    30
}

pub(crate) fn default_auto_launch() -> bool {
    true
}

pub(crate) fn default_launch_command() -> String {
    DEFAULT_LAUNCH_COMMAND.to_string()
}

pub(crate) fn default_queue_capacity() -> usize {
    1000
}

pub(crate) fn default_queue_pacing_ms() -> u64 {
    120
}
