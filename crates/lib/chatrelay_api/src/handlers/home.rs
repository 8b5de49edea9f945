//! Landing page.

use axum::response::Html;

use crate::pages;

/// `GET /` — static page confirming the relay is up.
pub async fn landing_page() -> Html<&'static str> {
    Html(pages::LANDING_PAGE)
}
