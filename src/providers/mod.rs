//! Hosted service presets

pub mod fastmail;
pub mod mailgun;

#[cfg(test)]
mod tests;

pub use fastmail::Fastmail;
pub use mailgun::Mailgun;

use crate::error::Error;
use crate::zone::builder::ZoneBuilder;

impl ZoneBuilder {
    pub fn add_fastmail(&mut self, ttl: Option<u32>) -> Result<&mut Self, Error> {
        self.apply_preset(&Fastmail { ttl })
    }

    pub fn add_mailgun(&mut self, mailgun: &Mailgun) -> Result<&mut Self, Error> {
        self.apply_preset(mailgun)
    }
}
