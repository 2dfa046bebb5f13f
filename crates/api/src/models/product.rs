//! Product input type.

use mindwhiz_core::{Availability, Price};

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub availability: Availability,
    pub image_url: String,
}
