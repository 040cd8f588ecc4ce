pub mod health;
pub mod odds;
