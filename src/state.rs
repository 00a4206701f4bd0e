use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::services::JwtKeys;
use crate::auth::session::SessionHolder;
use crate::config::AppConfig;
use crate::db;
use crate::store::{FinanceStore, PgStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FinanceStore>,
    pub config: Arc<AppConfig>,
    pub sessions: SessionHolder,
}

impl FromRef<AppState> for SessionHolder {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await;

        let store = Arc::new(PgStore::new(pool)) as Arc<dyn FinanceStore>;
        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn FinanceStore>, config: Arc<AppConfig>) -> Self {
        let sessions = SessionHolder::new(store.clone(), JwtKeys::from(&config.jwt));
        Self {
            store,
            config,
            sessions,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::store::memory::MemoryStore;

        let store = Arc::new(MemoryStore::new()) as Arc<dyn FinanceStore>;
        Self::from_parts(store, Arc::new(crate::config::test_config()))
    }
}
