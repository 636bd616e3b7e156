use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::store::TemplateRepository;
use crate::template::{TemplateEngine, TemplateService};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub template_service: Arc<TemplateService>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings, repository: Arc<dyn TemplateRepository>) -> Self {
        let engine = TemplateEngine::new(Arc::new(settings.limits.clone()));
        let template_service = Arc::new(TemplateService::new(repository, engine));

        Self {
            settings: Arc::new(settings),
            template_service,
            start_time: Instant::now(),
        }
    }
}
