use crate::error::Error;
use crate::zone::builder::ZoneBuilder;

/// A bundle of records a hosted service asks its customers to publish.
///
/// Presets must not write their own apex SPF record; they register their
/// include with [`ZoneBuilder::register_spf_include`] so it is merged into the
/// single policy built at render time.
pub trait ProviderPreset {
    fn name(&self) -> &str;
    fn apply(&self, zone: &mut ZoneBuilder) -> Result<(), Error>;
}
