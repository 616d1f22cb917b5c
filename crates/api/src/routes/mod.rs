pub mod admin;
pub mod appointments;
pub mod availability;
pub mod directory;
pub mod health;
