use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

use crate::model::{id::RoomId, room::Room};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    // すべての部屋を ID 順に取得する
    async fn find_all(&self) -> AppResult<Vec<Room>>;
    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>>;
    // 期間 [start_date, end_date) に重なる制限を持たない部屋を ID 順に取得する
    async fn search_availability(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<Room>>;
    // 指定の部屋が期間 [start_date, end_date) に空いているか
    async fn is_room_available(
        &self,
        room_id: RoomId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<bool>;
}
