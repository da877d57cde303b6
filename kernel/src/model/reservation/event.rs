use crate::model::id::{ReservationId, RestrictionId, RoomId};
use chrono::NaiveDate;
use derive_new::new;

#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct CreateReservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub room_id: RoomId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct CreateRoomRestriction {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: RoomId,
    pub reservation_id: ReservationId,
    pub restriction_id: RestrictionId,
}

impl CreateRoomRestriction {
    // 予約によって発生する制限は予約と同じ期間・同じ部屋を対象とする
    pub fn for_reservation(event: &CreateReservation, reservation_id: ReservationId) -> Self {
        Self {
            start_date: event.start_date,
            end_date: event.end_date,
            room_id: event.room_id,
            reservation_id,
            restriction_id: RestrictionId::RESERVATION,
        }
    }
}
