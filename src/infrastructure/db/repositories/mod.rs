pub mod consultation_repository_sqlx;
pub mod draft_repository_sqlx;
pub mod user_repository_sqlx;
pub mod version_repository_sqlx;
