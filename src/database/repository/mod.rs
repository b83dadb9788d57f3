//! Repositories.

mod group_repository;
mod membership_repository;
mod user_repository;

pub use group_repository::GroupRepo;
pub use membership_repository::MemberRepo;
pub use user_repository::UserRepo;
