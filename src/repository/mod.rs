//! 存储访问层
//! 所有仓库共享同一个 JsonStore 文档

pub mod chirp_repo;
pub mod token_repo;
pub mod user_repo;

pub use chirp_repo::ChirpRepository;
pub use token_repo::TokenRepository;
pub use user_repo::UserRepository;
