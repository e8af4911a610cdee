//! Relay-style cursor pagination over the Storefront `products` connection.
//!
//! Each page carries `pageInfo { hasNextPage endCursor }`. The next request
//! passes `endCursor` as `after`. A server that reports another page but
//! hands back no cursor, or the same cursor again, would loop forever, so
//! both cases are reported as [`NextPage::Stalled`].

use crate::types::PageInfo;

/// What the bulk loader should do after a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// `hasNextPage` was false.
    Done,
    /// Request the next page with this cursor.
    Continue(String),
    /// `hasNextPage` was true but the cursor is missing, empty, or unchanged.
    Stalled,
}

/// Decides the next step from `page_info`, given the cursor that produced the
/// current page (`None` for the first page).
#[must_use]
pub fn next_page(page_info: &PageInfo, previous_cursor: Option<&str>) -> NextPage {
    if !page_info.has_next_page {
        return NextPage::Done;
    }
    match page_info.end_cursor.as_deref() {
        Some(cursor) if !cursor.is_empty() && Some(cursor) != previous_cursor => {
            NextPage::Continue(cursor.to_owned())
        }
        _ => NextPage::Stalled,
    }
}
