//! Builds DNS zone files in memory and renders them as tab-aligned BIND text
//! or as a JSON record list.

pub mod config;
pub mod error;
pub mod plan;
pub mod providers;
pub mod zone;

pub use config::Config;
pub use error::{Error, Result};
pub use plan::ZonePlan;
pub use providers::{Fastmail, Mailgun};
pub use zone::builder::ZoneBuilder;
pub use zone::provider::ProviderPreset;
pub use zone::record::{Record, RecordClass, RecordType};
pub use zone::render::OutputFormat;
pub use zone::spf::{SpfMode, SpfParams};
