use serde::{Deserialize, Serialize};

use crate::model::id::RoomId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: RoomId,
    pub room_name: String,
}
