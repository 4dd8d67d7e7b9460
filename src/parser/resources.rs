//! Walking page resources to find image XObjects.

use std::collections::HashSet;

use lopdf::{Dictionary, Object, ObjectId};

use super::document::SourceDocument;
use crate::error::Result;

/// How far up the page tree we look for inherited `/Resources`.
const MAX_TREE_DEPTH: usize = 64;

/// List the image XObjects used by a page.
///
/// Images inside form XObjects are included. Each image is listed once, at
/// the position where it is first met.
pub(crate) fn collect_page_images(
    source: &SourceDocument,
    page_id: ObjectId,
) -> Result<Vec<ObjectId>> {
    let mut images = Vec::new();
    if let Some(resources) = page_resources(source, page_id)? {
        let mut visited_forms = HashSet::new();
        walk_xobjects(source, resources, &mut images, &mut visited_forms);
    }
    Ok(images)
}

/// The page's own `/Resources`, or the nearest ancestor's.
fn page_resources(source: &SourceDocument, page_id: ObjectId) -> Result<Option<&Dictionary>> {
    let mut node = source.raw().get_dictionary(page_id)?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            return Ok(Some(source.resolve(resources)?.as_dict()?));
        }
        match node.get(b"Parent") {
            Ok(parent) => node = source.resolve(parent)?.as_dict()?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

fn walk_xobjects(
    source: &SourceDocument,
    resources: &Dictionary,
    images: &mut Vec<ObjectId>,
    visited_forms: &mut HashSet<ObjectId>,
) {
    let xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|x| source.resolve(x).ok())
        .and_then(|x| x.as_dict().ok());
    let Some(xobjects) = xobjects else {
        return;
    };

    for (name, entry) in xobjects.iter() {
        let name = String::from_utf8_lossy(name);
        let Ok(id) = entry.as_reference() else {
            log::debug!("XObject /{} is not an indirect stream, skipping", name);
            continue;
        };
        let stream = match source.raw().get_object(id).and_then(Object::as_stream) {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("XObject /{} ({} {} R) is unreadable: {}", name, id.0, id.1, e);
                continue;
            }
        };

        match stream.dict.get(b"Subtype").and_then(Object::as_name_str) {
            Ok("Image") => {
                if !images.contains(&id) {
                    images.push(id);
                }
            }
            Ok("Form") if visited_forms.insert(id) => {
                let nested = stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .and_then(|r| source.resolve(r).ok())
                    .and_then(|r| r.as_dict().ok());
                if let Some(nested) = nested {
                    walk_xobjects(source, nested, images, visited_forms);
                }
            }
            _ => {}
        }
    }
}
