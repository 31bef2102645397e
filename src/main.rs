use anyhow::anyhow;
use peer_cache::config::{NodeConfig, USAGE};
use peer_cache::group::handlers::api_router;
use peer_cache::group::{GroupRegistry, loader_fn};
use peer_cache::peers::PeerPool;
use peer_cache::peers::handlers::{PeerEndpoint, peer_router};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose");

    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = match NodeConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            eprintln!("Example: peer-cache --bind 127.0.0.1:8001 --peer 127.0.0.1:8002 --api");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting node {} on {}", config.self_url, config.bind_addr);

    // 1. Groups:
    let registry = GroupRegistry::new();
    let scores = registry.new_group("scores", config.cache_bytes, slow_db_loader())?;

    // 2. Peers:
    let pool = Arc::new(
        PeerPool::new(&config.self_url)
            .with_base_path(&config.base_path)
            .with_replicas(config.replicas)
            .with_timeout(config.peer_timeout)
            .with_attempts(config.peer_attempts),
    );
    pool.set_peers(&config.peers);
    scores.register_peers(pool.clone())?;
    tracing::info!("Peers: {:?}", pool.peers());

    // 3. HTTP Router:
    let endpoint = PeerEndpoint {
        self_url: pool.self_url().to_string(),
        base_path: pool.base_path().to_string(),
    };
    let mut app = peer_router(registry.clone(), endpoint);
    if config.api {
        app = app.merge(api_router(registry.clone()));
        tracing::info!("API enabled at /api/<group>/<key>");
    }

    // 4. Spawn stats reporter:
    let stats_registry = registry.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30));

        loop {
            interval.tick().await;
            for group in stats_registry.groups() {
                let stats = group.stats();
                tracing::info!(
                    "Group {}: gets={} hits={} peer_loads={} loads={} entries={} bytes={}/{}",
                    group.name(),
                    stats.gets,
                    stats.cache_hits,
                    stats.peer_loads,
                    stats.loads,
                    stats.store.entries,
                    stats.store.bytes,
                    stats.store.max_bytes
                );
            }
        }
    });

    // 5. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("peer-cache is running at {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Origin loader over a small in-memory table standing in for a slow database.
fn slow_db_loader() -> peer_cache::group::LoaderFn {
    let db: Arc<HashMap<&'static str, &'static str>> =
        Arc::new(HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]));

    loader_fn(move |key: String| {
        let db = db.clone();
        async move {
            tracing::info!("[SlowDB] search key {}", key);
            db.get(key.as_str())
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| anyhow!("{} not exist", key))
        }
    })
}
