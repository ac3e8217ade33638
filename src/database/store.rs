use std::sync::Arc;

use sqlx::PgPool;

use crate::database::memory::MemoryRepository;
use crate::database::models::{
    Appointment, Contact, ContactInfo, GalleryItem, JobApplication, NewsPost, Site, TeamMember, User,
};
use crate::database::repository::{PgRepository, Repository};

/// One repository per entity.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Repository<User>>,
    pub team: Arc<dyn Repository<TeamMember>>,
    pub sites: Arc<dyn Repository<Site>>,
    pub gallery: Arc<dyn Repository<GalleryItem>>,
    pub news: Arc<dyn Repository<NewsPost>>,
    pub contacts: Arc<dyn Repository<Contact>>,
    pub contact_info: Arc<dyn Repository<ContactInfo>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub applications: Arc<dyn Repository<JobApplication>>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgRepository::new(pool.clone())),
            team: Arc::new(PgRepository::new(pool.clone())),
            sites: Arc::new(PgRepository::new(pool.clone())),
            gallery: Arc::new(PgRepository::new(pool.clone())),
            news: Arc::new(PgRepository::new(pool.clone())),
            contacts: Arc::new(PgRepository::new(pool.clone())),
            contact_info: Arc::new(PgRepository::new(pool.clone())),
            appointments: Arc::new(PgRepository::new(pool.clone())),
            applications: Arc::new(PgRepository::new(pool)),
        }
    }

    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryRepository::new()),
            team: Arc::new(MemoryRepository::new()),
            sites: Arc::new(MemoryRepository::new()),
            gallery: Arc::new(MemoryRepository::new()),
            news: Arc::new(MemoryRepository::new()),
            contacts: Arc::new(MemoryRepository::new()),
            contact_info: Arc::new(MemoryRepository::new()),
            appointments: Arc::new(MemoryRepository::new()),
            applications: Arc::new(MemoryRepository::new()),
        }
    }
}
