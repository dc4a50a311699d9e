//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, Resolver, StatsService};
use crate::config::Config;
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_worker::AnalyticsRecorder;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;

/// Request-independent settings used by handlers.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub base_url: String,
    pub max_generation_attempts: usize,
    pub redirect_permanent: bool,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            max_generation_attempts: config.max_generation_attempts,
            redirect_permanent: config.redirect_permanent,
        }
    }
}

/// Cloneable handle to services and shared resources.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn LinkRepository>,
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub resolver: Arc<Resolver<dyn LinkRepository>>,
    pub stats_service: Arc<StatsService<dyn LinkRepository>>,
    pub recorder: AnalyticsRecorder,
    pub cache: Arc<dyn CacheService>,
    pub settings: Arc<AppSettings>,
}

impl AppState {
    /// Wires the services around a single link store.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        generator: Arc<dyn CodeGenerator>,
        cache: Arc<dyn CacheService>,
        recorder: AnalyticsRecorder,
        settings: AppSettings,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            Arc::clone(&repository),
            generator,
            settings.max_generation_attempts,
        ));
        let resolver = Arc::new(Resolver::new(Arc::clone(&repository), Arc::clone(&cache)));
        let stats_service = Arc::new(StatsService::new(Arc::clone(&repository)));

        Self {
            repository,
            link_service,
            resolver,
            stats_service,
            recorder,
            cache,
            settings: Arc::new(settings),
        }
    }
}
