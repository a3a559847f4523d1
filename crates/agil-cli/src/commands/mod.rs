pub mod config;
pub mod init;
pub mod link;
pub mod topic;
