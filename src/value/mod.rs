//! Typed column values shared by the entities.

mod contact;
mod fare;
mod localized;

pub use contact::ContactData;
pub use fare::FareConditions;
pub use localized::{LocalizedText, LocalizedTextError, FALLBACK_LANGUAGE};
