//! 数据模型模块
//! 用户、chirp 与认证相关的领域模型和请求/响应 DTO

pub mod auth;
pub mod chirp;
pub mod user;
