//! Persistence backend selection for the CLI.

use wanderlist_core::{AppConfig, NewPlace, Place, PlaceRepository, RepositoryError};
use wanderlist_db::{PgPlaceRepository, PoolConfig};
use wanderlist_enrich::InMemoryPlaceRepository;

/// Postgres when `DATABASE_URL` is set, otherwise a process-local list.
#[derive(Debug, Clone)]
pub(crate) enum CliRepository {
    Postgres(PgPlaceRepository),
    Memory(InMemoryPlaceRepository),
}

impl CliRepository {
    /// Connects and migrates when a database is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or a migration fails.
    pub(crate) async fn from_config(config: &AppConfig, seed_demo: bool) -> anyhow::Result<Self> {
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!("DATABASE_URL is not set; changes will not be persisted");
            let repository = if seed_demo {
                InMemoryPlaceRepository::demo()
            } else {
                InMemoryPlaceRepository::new()
            };
            return Ok(Self::Memory(repository));
        };

        if seed_demo {
            tracing::warn!("--seed-demo ignored: a database is configured");
        }

        let pool = wanderlist_db::connect_pool(url, PoolConfig::from_app_config(config))
            .await
            .map_err(|e| anyhow::anyhow!("failed to connect to database: {e}"))?;
        let applied = wanderlist_db::run_migrations(&pool).await?;
        if applied > 0 {
            tracing::info!(applied, "migrations applied");
        }
        Ok(Self::Postgres(PgPlaceRepository::new(pool)))
    }

    pub(crate) fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl PlaceRepository for CliRepository {
    async fn list(&self) -> Result<Vec<Place>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.list().await,
            Self::Memory(repo) => repo.list().await,
        }
    }

    async fn create(&self, place: NewPlace) -> Result<Place, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.create(place).await,
            Self::Memory(repo) => repo.create(place).await,
        }
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.delete(id).await,
            Self::Memory(repo) => repo.delete(id).await,
        }
    }
}
