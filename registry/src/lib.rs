use std::sync::Arc;

use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::repository::room::RoomRepositoryImpl;
use adapter::template::TemplateStore;
use adapter::{database::ConnectionPool, repository::health::HealthCheckRepositoryImpl};
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::room::RoomRepository;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    room_repository: Arc<dyn RoomRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    template_store: Arc<TemplateStore>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, template_store: TemplateStore) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let room_repository = Arc::new(RoomRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        Self::with_repositories(
            health_check_repository,
            room_repository,
            reservation_repository,
            template_store,
        )
    }

    // データベース以外の実装（テスト用のインメモリ実装など）を差し込む場合に使う
    pub fn with_repositories(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        room_repository: Arc<dyn RoomRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
        template_store: TemplateStore,
    ) -> Self {
        Self {
            health_check_repository,
            room_repository,
            reservation_repository,
            template_store: Arc::new(template_store),
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn room_repository(&self) -> Arc<dyn RoomRepository> {
        self.room_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn template_store(&self) -> Arc<TemplateStore> {
        self.template_store.clone()
    }
}
