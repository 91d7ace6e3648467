use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::SessionKeys,
    db::dao::{DaoContext, RecordEntity},
    mailer::Mailer,
    services::{
        enquiry_service::EnquiryService, entity_service::EntityService,
        search_service::SearchService,
        section_service::{SectionService, SingletonRecord},
        session_service::SessionService, site_service::SiteService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn daos(&self) -> &DaoContext {
        &self.daos
    }

    /// CRUD service for any managed table, e.g. `ctx.entity::<project::Entity>()`.
    pub fn entity<E: RecordEntity>(&self) -> EntityService<E> {
        EntityService::new(&self.daos)
    }

    pub fn section<E: SingletonRecord>(&self) -> SectionService<E> {
        SectionService::new(&self.daos)
    }

    pub fn session(&self, keys: &SessionKeys, ttl_hours: i64) -> SessionService {
        SessionService::new(self.daos.user(), self.daos.session(), keys.clone(), ttl_hours)
    }

    pub fn search(&self) -> SearchService {
        SearchService::new(&self.daos)
    }

    pub fn site(&self) -> SiteService {
        SiteService::new(&self.daos)
    }

    pub fn enquiry(&self, mailer: &Mailer) -> EnquiryService {
        EnquiryService::new(&self.daos, mailer.clone())
    }
}
