use anyhow::Result;
use tracing::{info, trace};

use super::initdb::apply_migrations;
use super::serve::run_server;
use crate::config::{initialize_app_state, AppConfig};

pub async fn migrate_and_serve(config: AppConfig) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    let bind_address = config.bind_address.clone();
    let state = initialize_app_state(config).await?;
    apply_migrations(&state.db).await?;

    run_server(state, &bind_address).await
}
