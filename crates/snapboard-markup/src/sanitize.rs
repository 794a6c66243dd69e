//! Final HTML sanitizing pass applied to every formatter's output

use ammonia::Builder;

const LINK_REL: &str = "nofollow noopener noreferrer";

/// Strip everything outside the allowed tag/attribute/scheme lists and
/// add `rel` to links.
pub(crate) fn sanitize(html: &str) -> String {
    let mut builder = Builder::default();
    builder.link_rel(Some(LINK_REL));
    builder.clean(html).to_string()
}
