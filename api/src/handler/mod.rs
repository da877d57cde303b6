pub mod availability;
pub mod health;
pub mod page;
pub mod reservation;
