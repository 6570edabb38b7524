//! List command handler

use crate::error::Result;
use crate::output::{OutputWriter, TransformListing};
use pipeform_core::TransformType;

/// Handle the list command
pub fn handle_list(output: &mut OutputWriter) -> Result<()> {
    output.transform_list(&listings())
}

/// Every built-in transform, sorted by identifier
fn listings() -> Vec<TransformListing> {
    let mut listings: Vec<TransformListing> = TransformType::ALL
        .iter()
        .map(|t| TransformListing {
            name: t.as_str().to_string(),
            category: t.category().to_string(),
            is_async: t.is_async(),
        })
        .collect();
    listings.sort_by(|a, b| a.name.cmp(&b.name));
    listings
}
