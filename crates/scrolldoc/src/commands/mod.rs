pub mod build;
pub mod init;
pub mod readme;
pub mod serve;
