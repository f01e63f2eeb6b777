pub mod health;
pub mod labels;
