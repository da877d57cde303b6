use crate::database::{model::room::RoomRow, ConnectionPool};
use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use kernel::model::{id::RoomId, room::Room};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn find_all(&self) -> AppResult<Vec<Room>> {
        sqlx::query_as::<_, RoomRow>(
            r#"
                SELECT id AS room_id, room_name
                FROM rooms
                ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Room::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, RoomRow>(
            r#"
                SELECT id AS room_id, room_name
                FROM rooms
                WHERE id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Room::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn search_availability(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<Room>> {
        // 重複条件：
        //     new.start < existing.end AND existing.start < new.end
        // 終了日当日はチェックアウト日のため重複とはみなさない
        sqlx::query_as::<_, RoomRow>(
            r#"
                SELECT r.id AS room_id, r.room_name
                FROM rooms AS r
                WHERE r.id NOT IN (
                    SELECT rr.room_id
                    FROM room_restrictions AS rr
                    WHERE $1 < rr.end_date
                      AND rr.start_date < $2
                )
                ORDER BY r.id ASC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Room::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn is_room_available(
        &self,
        room_id: RoomId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<bool> {
        // 存在しない部屋を空室として扱わない
        if self.find_by_id(room_id).await?.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "room ({room_id}) was not found"
            )));
        }

        let overlapping: i64 = sqlx::query_scalar(
            r#"
                SELECT COUNT(*)
                FROM room_restrictions
                WHERE room_id = $1
                  AND $2 < end_date
                  AND start_date < $3
            "#,
        )
        .bind(room_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(overlapping == 0)
    }
}
