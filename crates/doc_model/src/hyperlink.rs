//! Hyperlink target resolution

use crate::{tags, XmlElement};
use std::collections::HashMap;

/// Maps a hyperlink's relationship ID to its target URL.
///
/// The mapping comes from the main document part's relationships, which the
/// document model itself does not own.
pub trait LinkResolver {
    fn resolve(&self, rel_id: &str) -> Option<String>;
}

impl LinkResolver for HashMap<String, String> {
    fn resolve(&self, rel_id: &str) -> Option<String> {
        self.get(rel_id).cloned()
    }
}

impl<T: LinkResolver + ?Sized> LinkResolver for &T {
    fn resolve(&self, rel_id: &str) -> Option<String> {
        (**self).resolve(rel_id)
    }
}

/// Resolver that knows no targets
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLinks;

impl LinkResolver for NoLinks {
    fn resolve(&self, _rel_id: &str) -> Option<String> {
        None
    }
}

/// Resolve the URL of a `w:hyperlink` element
pub fn hyperlink_target(hyperlink: &XmlElement, links: &dyn LinkResolver) -> Option<String> {
    hyperlink
        .attribute(tags::RELATIONSHIP_ID)
        .and_then(|rel_id| links.resolve(rel_id))
}
