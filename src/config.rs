//! Node Configuration
//!
//! Command-line settings of a cache node.

use crate::peers::protocol::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS, normalize_base_path, normalize_peer_url};

use anyhow::{Result, anyhow};
use std::net::SocketAddr;
use std::time::Duration;

pub const USAGE: &str = "Usage: peer-cache --bind <addr:port> [--self <url>] [--peer <url>]... \
[--base-path <path>] [--replicas <n>] [--cache-bytes <n>] [--peer-timeout-ms <n>] \
[--peer-attempts <n>] [--api] [--verbose]";

pub const DEFAULT_CACHE_BYTES: u64 = 2 << 10;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Base URL peers use to reach this node.
    pub self_url: String,
    /// Every node of the cluster, this one included.
    pub peers: Vec<String>,
    pub base_path: String,
    pub replicas: usize,
    pub cache_bytes: u64,
    pub peer_timeout: Duration,
    pub peer_attempts: usize,
    /// Also serve the client-facing `/api` routes.
    pub api: bool,
    pub verbose: bool,
}

impl NodeConfig {
    /// Parses the arguments that follow the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();

        let mut bind_addr: Option<SocketAddr> = None;
        let mut self_url: Option<String> = None;
        let mut peers: Vec<String> = vec![];
        let mut base_path = DEFAULT_BASE_PATH.to_string();
        let mut replicas = DEFAULT_REPLICAS;
        let mut cache_bytes = DEFAULT_CACHE_BYTES;
        let mut peer_timeout = Duration::from_millis(500);
        let mut peer_attempts = 2;
        let mut api = false;
        let mut verbose = false;

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--api" => api = true,
                "--verbose" => verbose = true,
                "--bind" | "--self" | "--peer" | "--base-path" | "--replicas" | "--cache-bytes"
                | "--peer-timeout-ms" | "--peer-attempts" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow!("{} requires a value", flag))?;
                    match flag {
                        "--bind" => bind_addr = Some(value.parse()?),
                        "--self" => self_url = Some(value.clone()),
                        "--peer" => peers.push(value.clone()),
                        "--base-path" => base_path = value.clone(),
                        "--replicas" => replicas = value.parse()?,
                        "--cache-bytes" => cache_bytes = value.parse()?,
                        "--peer-timeout-ms" => peer_timeout = Duration::from_millis(value.parse()?),
                        _ => peer_attempts = value.parse()?,
                    }
                    i += 1;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument: {}", other);
                }
            }
            i += 1;
        }

        let bind_addr = bind_addr.ok_or_else(|| anyhow!("--bind is required"))?;
        if replicas == 0 {
            return Err(anyhow!("--replicas must be at least 1"));
        }

        let self_url = normalize_peer_url(&self_url.unwrap_or_else(|| bind_addr.to_string()));
        let mut peers: Vec<String> = peers.iter().map(|p| normalize_peer_url(p)).collect();
        if !peers.contains(&self_url) {
            peers.push(self_url.clone());
        }

        Ok(Self {
            bind_addr,
            self_url,
            peers,
            base_path: normalize_base_path(&base_path),
            replicas,
            cache_bytes,
            peer_timeout,
            peer_attempts,
            api,
            verbose,
        })
    }
}
