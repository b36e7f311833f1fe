//! Module wiring and lifecycle

use crate::api::native::NativeClient;
use crate::api::rest::{auth::TokenVerifier, routes};
use crate::config::Config;
use crate::contract::BlogApi;
use crate::domain::{EventPublisher, Repositories, Service, TracingEventPublisher};
use crate::infra::storage::{
    migrations::Migrator, SeaOrmCategoryRepository, SeaOrmPostRepository,
    SeaOrmSubcategoryRepository, SeaOrmTagRepository,
};
use anyhow::Result;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Blog service module
///
/// Owns the domain service and exposes it as an axum router and as a
/// native [`BlogApi`] client.
pub struct BlogServiceModule {
    service: Arc<Service>,
    verifier: Arc<TokenVerifier>,
}

impl BlogServiceModule {
    /// Apply pending database migrations
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        tracing::info!("Blog service migrations completed");
        Ok(())
    }

    /// Build the module on top of SeaORM repositories
    pub async fn init(config: Config, db: Arc<DatabaseConnection>) -> Result<Self> {
        let repos = Repositories {
            categories: Arc::new(SeaOrmCategoryRepository::new(db.clone())),
            subcategories: Arc::new(SeaOrmSubcategoryRepository::new(db.clone())),
            tags: Arc::new(SeaOrmTagRepository::new(db.clone())),
            posts: Arc::new(SeaOrmPostRepository::new(db)),
        };

        Self::with_repositories(config, repos, Arc::new(TracingEventPublisher)).await
    }

    /// Build the module on top of arbitrary repositories
    ///
    /// Makes sure a default category exists before any request is served.
    pub async fn with_repositories(
        config: Config,
        repos: Repositories,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self> {
        let verifier = if config.auth.enabled {
            TokenVerifier::new(&config.auth)?
        } else {
            tracing::warn!("Admin authentication is disabled");
            TokenVerifier::disabled()
        };

        let service = Arc::new(Service::new(repos, event_publisher, config));
        let default = service.ensure_default_category().await?;

        tracing::info!(
            default_category = %default.name,
            "Blog service initialized"
        );
        Ok(Self {
            service,
            verifier: Arc::new(verifier),
        })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process reader client
    pub fn client(&self) -> Arc<dyn BlogApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// REST routes for the admin and public APIs
    pub fn router(&self) -> axum::Router {
        routes::router(self.service.clone(), self.verifier.clone())
    }
}
