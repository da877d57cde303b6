use crate::database::ConnectionPool;
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{ReservationId, RoomId},
    reservation::event::{CreateReservation, CreateRoomRestriction},
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};
use sqlx::PgConnection;

// 排他制約（room_restrictions_no_overlap）違反の SQLSTATE
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn insert_reservation(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut conn = self
            .db
            .inner_ref()
            .acquire()
            .await
            .map_err(AppError::SpecificOperationError)?;
        insert_reservation_with(&mut conn, &event).await
    }

    async fn insert_room_restriction(&self, event: CreateRoomRestriction) -> AppResult<()> {
        let mut conn = self
            .db
            .inner_ref()
            .acquire()
            .await
            .map_err(AppError::SpecificOperationError)?;
        insert_room_restriction_with(&mut conn, &event).await
    }

    async fn book(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定の部屋 ID をもつ部屋が存在するか
        // - 存在した場合、その期間に制限が入っていないか
        {
            self.ensure_room_exists(&mut tx, event.room_id).await?;

            let overlap: Option<i32> = sqlx::query_scalar(
                r#"
                    SELECT id
                    FROM room_restrictions
                    WHERE room_id = $1
                      AND start_date < $3
                      AND $2 < end_date
                    LIMIT 1
                "#,
            )
            .bind(event.room_id)
            .bind(event.start_date)
            .bind(event.end_date)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if overlap.is_some() {
                return Err(AppError::UnprocessableEntity(format!(
                    "room ({}) is already restricted between {} and {}",
                    event.room_id, event.start_date, event.end_date
                )));
            }
        }

        // 予約を登録し、採番された予約 ID で部屋の制限を登録する
        let reservation_id = insert_reservation_with(&mut tx, &event).await?;
        let restriction = CreateRoomRestriction::for_reservation(&event, reservation_id);
        insert_room_restriction_with(&mut tx, &restriction).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            reservation.id = %reservation_id,
            room.id = %event.room_id,
            "reservation booked"
        );

        Ok(reservation_id)
    }
}

impl ReservationRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn ensure_room_exists(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
    ) -> AppResult<()> {
        let room: Option<i32> = sqlx::query_scalar("SELECT id FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        match room {
            Some(_) => Ok(()),
            None => Err(AppError::EntityNotFound(format!(
                "room ({room_id}) was not found"
            ))),
        }
    }
}

async fn insert_reservation_with(
    conn: &mut PgConnection,
    event: &CreateReservation,
) -> AppResult<ReservationId> {
    sqlx::query_scalar(
        r#"
            INSERT INTO reservations
            (first_name, last_name, email, phone,
            start_date, end_date, room_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING id
        "#,
    )
    .bind(&event.first_name)
    .bind(&event.last_name)
    .bind(&event.email)
    .bind(&event.phone)
    .bind(event.start_date)
    .bind(event.end_date)
    .bind(event.room_id)
    .fetch_one(conn)
    .await
    .map_err(AppError::SpecificOperationError)
}

async fn insert_room_restriction_with(
    conn: &mut PgConnection,
    event: &CreateRoomRestriction,
) -> AppResult<()> {
    let res = sqlx::query(
        r#"
            INSERT INTO room_restrictions
            (start_date, end_date, room_id, reservation_id,
            restriction_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        "#,
    )
    .bind(event.start_date)
    .bind(event.end_date)
    .bind(event.room_id)
    .bind(event.reservation_id)
    .bind(event.restriction_id)
    .execute(conn)
    .await
    .map_err(|e| {
        if is_exclusion_violation(&e) {
            AppError::UnprocessableEntity(format!(
                "room ({}) is already restricted between {} and {}",
                event.room_id, event.start_date, event.end_date
            ))
        } else {
            AppError::SpecificOperationError(e)
        }
    })?;

    if res.rows_affected() < 1 {
        return Err(AppError::NoRowsAffectedError(
            "No room_restriction record has been created".into(),
        ));
    }

    Ok(())
}

fn is_exclusion_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(EXCLUSION_VIOLATION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kernel::model::id::RestrictionId;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_event(room_id: i32, start: &str, end: &str) -> CreateReservation {
        CreateReservation::new(
            "Joanna".into(),
            "Smith".into(),
            "joanna@example.com".into(),
            "555-0100".into(),
            RoomId::new(room_id),
            date(start),
            date(end),
        )
    }

    #[sqlx::test(migrations = "../migrations")]
    #[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
    async fn test_book_writes_reservation_and_restriction(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let reservation_id = repo.book(create_event(1, "2024-01-10", "2024-01-12")).await?;

        let rows: Vec<(ReservationId, RoomId, NaiveDate, NaiveDate, RestrictionId)> =
            sqlx::query_as(
                r#"
                    SELECT reservation_id, room_id, start_date, end_date, restriction_id
                    FROM room_restrictions
                "#,
            )
            .fetch_all(&pool)
            .await?;
        assert_eq!(
            rows,
            vec![(
                reservation_id,
                RoomId::new(1),
                date("2024-01-10"),
                date("2024-01-12"),
                RestrictionId::RESERVATION
            )]
        );
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    #[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
    async fn test_book_rejects_overlapping_range(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        repo.book(create_event(1, "2024-01-10", "2024-01-12")).await?;
        let res = repo.book(create_event(1, "2024-01-11", "2024-01-14")).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        // 失敗した予約は reservations にも残らない
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 1);

        // 別の部屋、またはチェックアウト日以降なら予約できる
        repo.book(create_event(2, "2024-01-11", "2024-01-14")).await?;
        repo.book(create_event(1, "2024-01-12", "2024-01-14")).await?;
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    #[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
    async fn test_book_unknown_room(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let res = repo.book(create_event(999, "2024-01-10", "2024-01-12")).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    #[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
    async fn test_separate_inserts(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let event = create_event(2, "2024-02-01", "2024-02-03");
        let reservation_id = repo.insert_reservation(event.clone()).await?;
        repo.insert_room_restriction(CreateRoomRestriction::for_reservation(
            &event,
            reservation_id,
        ))
        .await?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM room_restrictions WHERE reservation_id = $1")
                .bind(reservation_id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(count, 1);
        Ok(())
    }
}
