//! Lazy page streams over token-paginated listing calls
//!
//! Every TestGrid listing call takes an optional `nextToken` and returns one
//! alongside the page. [`paginate`] turns such a call into a [`Stream`] of
//! pages: the first request goes out without a token, each following request
//! carries the token of the previous page, and the stream ends on the first
//! page without one. A failed fetch is yielded as the stream's last item.
//!
//! Each stream owns its request, its fetch closure and the current token, so
//! any number of them can be polled side by side.

use futures::Stream;
use futures::stream;
use std::future::Future;

use crate::error::{Error, Result};

/// A listing request that can carry a continuation token
pub trait PageRequest: Clone {
    /// Return a copy of this request positioned at `token`
    fn with_next_token(self, token: Option<String>) -> Self;
}

/// One page of a listing response
pub trait Page {
    /// Element type of the page
    type Item;

    /// Continuation token, if more pages follow
    fn next_token(&self) -> Option<&str>;

    /// Consume the page, returning its items
    fn into_items(self) -> Vec<Self::Item>;
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

struct Paginator<R, F> {
    request: R,
    fetch: F,
    cursor: Cursor,
}

/// Stream every page of a listing, starting from `request`
pub fn paginate<R, P, F, Fut>(request: R, fetch: F) -> impl Stream<Item = Result<P>>
where
    R: PageRequest,
    P: Page,
    F: FnMut(R) -> Fut,
    Fut: Future<Output = Result<P>>,
{
    let state = Paginator {
        request,
        fetch,
        cursor: Cursor::Start,
    };

    stream::try_unfold(state, |mut state| async move {
        let token = match std::mem::replace(&mut state.cursor, Cursor::Done) {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
        };

        let request = state.request.clone().with_next_token(token);
        let page = (state.fetch)(request).await?;

        // An empty token means the same as no token
        if let Some(next) = page.next_token().filter(|t| !t.is_empty()) {
            state.cursor = Cursor::Next(next.to_string());
        }

        Ok::<_, Error>(Some((page, state)))
    })
}
