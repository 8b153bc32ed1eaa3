pub mod health;
pub mod interview;
