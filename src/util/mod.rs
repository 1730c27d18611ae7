pub mod config;

pub use config::RsaConfig;
