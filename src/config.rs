use std::path::PathBuf;

use clap::Parser;
use dotenv::dotenv;

use crate::loader::DEFAULT_DATA_FILE;

#[derive(Debug, Clone, Parser)]
#[command(name = "netdash", version, about = "Packet capture statistics dashboard")]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "NETDASH_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "NETDASH_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Capture CSV with Protocol, Source IP, Destination IP and Packet Size columns
    #[arg(long, env = "NETDASH_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Verbose logging
    #[arg(long, env = "NETDASH_DEBUG")]
    pub debug: bool,
}

impl Config {
    /// Reads `.env` (if present) and then the command line.
    pub fn load() -> Self {
        dotenv().ok();
        Config::parse()
    }

    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn default_log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 4] = ["NETDASH_HOST", "NETDASH_PORT", "NETDASH_DATA_FILE", "NETDASH_DEBUG"];

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        Config::try_parse_from(args.iter().copied())
    }

    #[test]
    fn defaults_match_development_server() {
        let config = parse(&["netdash"]).unwrap();
        assert_eq!(config.bind_address(), ("0.0.0.0", 5000));
        assert_eq!(config.data_file, PathBuf::from("network_data.csv"));
        assert_eq!(config.default_log_level(), "info");
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "netdash",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--data-file",
            "/tmp/capture.csv",
            "--debug",
        ])
        .unwrap();
        assert_eq!(config.bind_address(), ("127.0.0.1", 8080));
        assert_eq!(config.data_file, PathBuf::from("/tmp/capture.csv"));
        assert_eq!(config.default_log_level(), "debug");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(parse(&["netdash", "--port", "http"]).is_err());
    }
}
