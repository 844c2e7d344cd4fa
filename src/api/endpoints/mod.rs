pub mod admissions;
pub mod health;
pub mod rooms;
