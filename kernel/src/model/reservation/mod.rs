use crate::model::id::RoomId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

pub mod event;

use event::CreateReservation;

// 空室検索からサマリー表示までセッションで持ち回る、確定前の予約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub room_id: Option<RoomId>,
    pub room_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Reservation {
    pub fn for_range(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<Self> {
        if start_date >= end_date {
            return Err(AppError::ValidationError(format!(
                "start date ({start_date}) must be before end date ({end_date})"
            )));
        }
        Ok(Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            room_id: None,
            room_name: String::new(),
            start_date,
            end_date,
        })
    }

    pub fn to_create_event(&self) -> AppResult<CreateReservation> {
        let room_id = self.room_id.ok_or_else(|| {
            AppError::UnprocessableEntity("no room has been chosen for this reservation".into())
        })?;
        // 入力値の前後の空白は保存時にだけ取り除く
        Ok(CreateReservation::new(
            self.first_name.trim().to_string(),
            self.last_name.trim().to_string(),
            self.email.trim().to_string(),
            self.phone.trim().to_string(),
            room_id,
            self.start_date,
            self.end_date,
        ))
    }
}
