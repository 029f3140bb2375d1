use clap::Parser;
use distributed_cache::config::NodeArgs;
use distributed_cache::group::{LoaderFn, Registry};
use distributed_cache::transport::{HttpPool, NodeState, api_router, router};
use std::collections::HashMap;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = NodeArgs::parse();
    let self_addr = args.self_addr()?;

    tracing::info!("Starting cache node {}", self_addr);
    tracing::info!("Peers: {:?}", args.peers);

    // 1. Groups:
    let registry = Registry::new();
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);
    let scores = registry.create_group(
        &args.group,
        args.cache_bytes,
        LoaderFn::shared(move |key: &str| {
            tracing::info!("[SlowDB] search key {}", key);
            match db.get(key) {
                Some(value) => Ok(value.as_bytes().to_vec()),
                None => Err(anyhow::anyhow!("{} not exist", key)),
            }
        }),
    );

    // 2. Peers:
    let pool = Arc::new(HttpPool::with_options(
        &self_addr,
        distributed_cache::config::DEFAULT_BASE_PATH,
        args.replicas,
        args.peer_timeout(),
    ));
    pool.set(&args.peers);
    scores.register_peers(pool.clone());

    // 3. API front-end:
    if args.api {
        let app = api_router(scores.clone(), self_addr.clone());
        let listener = tokio::net::TcpListener::bind(args.api_addr).await?;
        tracing::info!("Front-end server is running at {}", args.api_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Front-end server stopped: {}", e);
            }
        });
    }

    // 4. Cache server:
    let node = Arc::new(NodeState {
        registry,
        self_addr: pool.self_addr().to_string(),
        default_group: args.group.clone(),
    });
    let app = router(node);

    let listen_addr = args.listen_addr();
    tracing::info!("Cache node listening on {}", listen_addr);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
