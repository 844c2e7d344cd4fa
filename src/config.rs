use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Wardflow";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory (~/Wardflow/ unless overridden)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Wardflow")
}

/// Database path: `WARDFLOW_DB` env var, or `<data dir>/ward.db`
pub fn database_path() -> PathBuf {
    std::env::var_os("WARDFLOW_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|| app_data_dir().join("ward.db"))
}

/// Bind address: `WARDFLOW_ADDR` env var, or 127.0.0.1:8317
pub fn bind_addr() -> SocketAddr {
    std::env::var("WARDFLOW_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8317)))
}

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "info,wardflow=debug".to_string()
}
