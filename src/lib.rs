pub mod config;
pub mod output;
pub mod publish;
pub mod regatta;
pub mod scoring;
pub mod standings;
