use serde::{Deserialize, Serialize};

// rooms, reservations, restrictions の各テーブルは SERIAL の主キーを持つため
// i32 を包む newtype として ID 型を定義する
macro_rules! define_id {
    ($id_type: ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $id_type(i32);

        impl $id_type {
            pub fn new(raw: i32) -> Self {
                Self(raw)
            }

            pub fn raw(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $id_type {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $id_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(RoomId);
define_id!(ReservationId);
define_id!(RestrictionId);

impl RestrictionId {
    // restrictions テーブルの初期データ（1: Reservation）
    pub const RESERVATION: Self = Self(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_transparent_in_json() {
        let json = serde_json::to_string(&RoomId::new(3)).unwrap();
        assert_eq!(json, "3");
        let id: ReservationId = serde_json::from_str("12").unwrap();
        assert_eq!(id, ReservationId::new(12));
    }
}
