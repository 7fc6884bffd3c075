pub mod consultation_repository;
pub mod draft_repository;
pub mod user_repository;
pub mod version_repository;
