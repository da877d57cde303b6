use kernel::model::{id::RoomId, room::Room};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub room_name: String,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow { room_id, room_name } = value;
        Room { room_id, room_name }
    }
}
