use std::sync::Arc;

use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::draft_repository::DraftRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::ports::version_repository::VersionRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    consultation_repo: Arc<dyn ConsultationRepository>,
    draft_repo: Arc<dyn DraftRepository>,
    version_repo: Arc<dyn VersionRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl AppServices {
    pub fn new(
        consultation_repo: Arc<dyn ConsultationRepository>,
        draft_repo: Arc<dyn DraftRepository>,
        version_repo: Arc<dyn VersionRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            consultation_repo,
            draft_repo,
            version_repo,
            user_repo,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn consultation_repo(&self) -> Arc<dyn ConsultationRepository> {
        self.services.consultation_repo.clone()
    }

    pub fn draft_repo(&self) -> Arc<dyn DraftRepository> {
        self.services.draft_repo.clone()
    }

    pub fn version_repo(&self) -> Arc<dyn VersionRepository> {
        self.services.version_repo.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }
}
