use std::sync::Arc;

use hof_core::{
    config::Config,
    registry::{ChannelRegistry, JsonFileStore},
};

#[tokio::main]
async fn main() -> Result<(), hof_core::Error> {
    hof_core::logging::init("hof")?;

    let cfg = Arc::new(Config::load()?);
    let store = JsonFileStore::new(cfg.channel_store.clone());
    let registry = Arc::new(ChannelRegistry::new(Box::new(store)));

    hof_discord::router::run_gateway(cfg, registry)
        .await
        .map_err(|e| hof_core::Error::External(format!("discord bot failed: {e}")))?;

    Ok(())
}
