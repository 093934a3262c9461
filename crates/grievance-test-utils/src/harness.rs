// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router harness: the real gateway over in-memory doubles.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use grievance_core::{GeoLocator, GrievanceStore, RunMode};
use grievance_gateway::{AppState, GrievanceService, ServerOptions, build_router};
use grievance_ip::{HeaderTable, IpResolver};
use tower::ServiceExt;

use crate::memory_store::MemoryGrievanceStore;

pub struct TestHarnessBuilder {
    mode: RunMode,
    locator: Option<Arc<dyn GeoLocator>>,
    store: Option<Arc<dyn GrievanceStore>>,
    static_dir: Option<PathBuf>,
    cors_origin: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            mode: RunMode::Production,
            locator: None,
            store: None,
            static_dir: None,
            cors_origin: None,
        }
    }

    /// Run mode for IP resolution. Defaults to production.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_locator(mut self, locator: Arc<dyn GeoLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Use a specific store instead of the built-in memory store.
    pub fn with_store(mut self, store: Arc<dyn GrievanceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    pub fn build(self) -> TestHarness {
        let memory = Arc::new(MemoryGrievanceStore::new());
        let store: Arc<dyn GrievanceStore> = match self.store {
            Some(store) => store,
            None => memory.clone(),
        };
        let service = GrievanceService::new(store, self.locator);
        let resolver = IpResolver::new(HeaderTable::builtin(), self.mode);
        let options = ServerOptions {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origin: self.cors_origin,
            static_dir: self.static_dir,
        };
        let router = build_router(AppState::new(service, resolver), &options)
            .expect("test router options are valid");
        TestHarness { router, memory }
    }
}

/// A ready router plus the memory store behind it.
pub struct TestHarness {
    router: Router,
    memory: Arc<MemoryGrievanceStore>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The memory store (unused when a custom store was supplied).
    pub fn store(&self) -> &MemoryGrievanceStore {
        &self.memory
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Send one request through a fresh clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// POST a JSON body to `/api/grievances` with extra headers.
    pub async fn post_grievance(
        &self,
        body: serde_json::Value,
        headers: &[(&str, &str)],
    ) -> Response<Body> {
        let mut builder = Request::post("/api/grievances").header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("valid test request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::get(uri)
            .body(Body::empty())
            .expect("valid test request");
        self.send(request).await
    }
}
