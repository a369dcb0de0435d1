//! `SeaORM` entity definitions.

pub mod currencies;
pub mod refresh_tokens;
pub mod users;
