pub mod builder;
pub mod provider;
pub mod record;
pub mod render;
pub mod spf;
