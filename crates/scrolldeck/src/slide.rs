use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::source::SourceError;

/// One full-viewport slide document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Stable key; survives reloads and reordering.
    pub id: i64,
    pub title: String,
    /// Opaque locator of the slide's document.
    pub url: String,
    /// Display position. Lists arrive already sorted by it.
    pub order: i64,
}

impl Slide {
    pub fn new(id: i64, title: impl Into<String>, url: impl Into<String>, order: i64) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            order,
        }
    }
}

/// Check the guarantees a slide list must already satisfy: ids are unique
/// and `order` never decreases. Lists are rejected, not repaired.
pub fn validate_sequence(slides: &[Slide]) -> Result<(), SourceError> {
    let mut seen = HashSet::with_capacity(slides.len());
    for (position, slide) in slides.iter().enumerate() {
        if !seen.insert(slide.id) {
            return Err(SourceError::DuplicateId(slide.id));
        }
        if position > 0 && slides[position - 1].order > slide.order {
            return Err(SourceError::Unsorted {
                id: slide.id,
                position,
            });
        }
    }
    Ok(())
}
