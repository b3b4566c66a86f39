// Daemon configuration (environment variables)

use supervised_api_rpc::RpcServerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaemonConfig {
    pub rpc: RpcServerConfig,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    /// Read `SUPERVISED_*` variables; unset or unparsable values fall back to
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = RpcServerConfig::default();

        let host = lookup("SUPERVISED_RPC_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);

        let port: u16 = lookup("SUPERVISED_RPC_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let max_connections: u32 = lookup("SUPERVISED_MAX_CONNECTIONS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_connections);

        let log_format = match lookup("SUPERVISED_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            rpc: RpcServerConfig {
                host,
                port,
                max_connections,
                ..defaults
            },
            log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> DaemonConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);

        assert_eq!(config.rpc, RpcServerConfig::default());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SUPERVISED_RPC_HOST", "0.0.0.0"),
            ("SUPERVISED_RPC_PORT", "8080"),
            ("SUPERVISED_MAX_CONNECTIONS", "16"),
            ("SUPERVISED_LOG_FORMAT", "json"),
        ]);

        assert_eq!(config.rpc.host, "0.0.0.0");
        assert_eq!(config.rpc.port, 8080);
        assert_eq!(config.rpc.max_connections, 16);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = config_from(&[("SUPERVISED_RPC_PORT", "not-a-port")]);
        assert_eq!(config.rpc.port, 9527);
    }
}
