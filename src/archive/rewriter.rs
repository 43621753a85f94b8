//! Reference rewriting
//!
//! Points every archived reference at its copy in the mirror using a
//! root-relative path (`/<host>/<path>`). References whose download failed or
//! which were never archivable keep their original value.

use crate::archive::archiver::ArchivedResource;

/// Rewrites archived references in place and returns how many were rewritten
pub fn rewrite_references(archived: &[ArchivedResource]) -> usize {
    let mut rewritten = 0;

    for resource in archived {
        let Some(location) = resource.status.location() else {
            continue;
        };

        if resource.reference.rewrite(&location.web_path()) {
            rewritten += 1;
        } else {
            tracing::debug!(
                "Element for {} '{}' no longer has a {} attribute",
                resource.reference.kind(),
                resource.reference.value(),
                resource.reference.attribute()
            );
        }
    }

    rewritten
}
