//! Order intake route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Uri, header},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;
use url::form_urlencoded;

use order_locator_core::Order;

use crate::error::Result;
use crate::state::AppState;

/// Intake form page template.
#[derive(Template, WebTemplate)]
#[template(path = "form.html")]
pub struct IntakeFormTemplate;

/// Display the order intake form.
#[instrument]
pub async fn form_page() -> impl IntoResponse {
    IntakeFormTemplate
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Read the order fields from a form-encoded body and the query string.
///
/// Body values take precedence over query values, and the first value of a
/// repeated key wins. A body with any other content type is ignored.
fn order_from_request(headers: &HeaderMap, uri: &Uri, body: &[u8]) -> Order {
    let body_pairs = is_form_encoded(headers)
        .then(|| form_urlencoded::parse(body))
        .into_iter()
        .flatten();
    let query_pairs = form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes());

    Order::from_form_pairs(body_pairs.chain(query_pairs))
}

/// Store a submitted order and send the client to the map.
///
/// POST /submit
///
/// Fields missing from the request are stored as empty strings. The body is
/// never rejected for its shape.
#[instrument(skip(state, headers, body))]
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Redirect> {
    let order = order_from_request(&headers, &uri, &body);
    state.store().create(&order).await?;
    tracing::info!("Order stored");

    Ok(Redirect::to("/map"))
}
