use chrono::NaiveDate;
use kernel::model::id::RoomId;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::ValidationError(format!("invalid date: {value:?}")))
}

#[derive(Debug, Deserialize)]
pub struct SearchAvailabilityRequest {
    // 欠けた値は空文字として受け取り、日付の解析で不正として扱う
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl SearchAvailabilityRequest {
    pub fn date_range(&self) -> AppResult<(NaiveDate, NaiveDate)> {
        Ok((parse_date(&self.start)?, parse_date(&self.end)?))
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityJsonQuery {
    pub start: String,
    pub end: String,
    pub room_id: RoomId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityJsonResponse {
    pub ok: bool,
    pub message: String,
    pub room_id: RoomId,
    pub start_date: String,
    pub end_date: String,
}

impl AvailabilityJsonResponse {
    pub fn new(available: bool, room_id: RoomId, start: NaiveDate, end: NaiveDate) -> Self {
        let message = if available {
            "Available!"
        } else {
            "No availability"
        };
        Self {
            ok: available,
            message: message.into(),
            room_id,
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date("2024-01-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(parse_date("01/10/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn missing_search_field_is_an_invalid_range() {
        let req: SearchAvailabilityRequest =
            serde_json::from_value(serde_json::json!({ "start": "2024-01-10" })).unwrap();
        assert_eq!(req.end, "");
        assert!(matches!(req.date_range(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn json_response_uses_camel_case() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let json = serde_json::to_value(AvailabilityJsonResponse::new(
            true,
            RoomId::new(1),
            day(10),
            day(12),
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ok": true,
                "message": "Available!",
                "roomId": 1,
                "startDate": "2024-01-10",
                "endDate": "2024-01-12",
            })
        );
    }
}
