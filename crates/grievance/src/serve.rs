// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `grievance serve`: open storage, wire the resolver and geolocation
//! lookup into the gateway, and serve until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use grievance_config::GrievanceConfig;
use grievance_core::{GeoLocator, GrievanceError, GrievanceStore, PluginAdapter};
use grievance_gateway::{AppState, GrievanceService, ServerOptions, start_server};
use grievance_geo::IpApiLocator;
use grievance_ip::{HeaderTable, IpResolver};
use grievance_storage::SqliteGrievanceStore;
use tracing::{error, info, warn};

use crate::shutdown;

pub async fn run_serve(config: GrievanceConfig) -> Result<(), GrievanceError> {
    init_tracing(&config.server.log_level);
    info!(mode = %config.server.mode, "starting grievance serve");

    let store = Arc::new(SqliteGrievanceStore::new(config.storage.clone()));
    if let Err(e) = store.initialize().await {
        error!(error = %e, path = %config.storage.database_path, "failed to open database");
        return Err(e);
    }

    let locator: Option<Arc<dyn GeoLocator>> = if config.geolocation.enabled {
        Some(Arc::new(IpApiLocator::from_config(&config.geolocation)?))
    } else {
        info!("geolocation lookups disabled");
        None
    };

    let headers = HeaderTable::builtin().with_extra(&config.ip.extra_headers);
    let resolver = IpResolver::new(headers, config.server.mode);

    let service = GrievanceService::new(store.clone() as Arc<dyn GrievanceStore>, locator);
    let options = ServerOptions {
        host: config.server.host.clone(),
        port: config.server.port,
        cors_origin: config.server.cors_origin.clone(),
        static_dir: config.server.static_dir.as_ref().map(PathBuf::from),
    };

    let cancel = shutdown::install_signal_handler();
    let served = start_server(
        &options,
        AppState::new(service, resolver),
        cancel.cancelled_owned(),
    )
    .await;

    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }
    served
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("grievance={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
