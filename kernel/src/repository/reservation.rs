use crate::model::{
    id::ReservationId,
    reservation::event::{CreateReservation, CreateRoomRestriction},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // reservations テーブルに 1 行追加し、採番された ID を返す
    async fn insert_reservation(&self, event: CreateReservation) -> AppResult<ReservationId>;
    // room_restrictions テーブルに 1 行追加する（更新は行わない）
    async fn insert_room_restriction(&self, event: CreateRoomRestriction) -> AppResult<()>;
    // 予約とそれに伴う部屋の制限を 1 つのトランザクションで登録する
    async fn book(&self, event: CreateReservation) -> AppResult<ReservationId>;
}
