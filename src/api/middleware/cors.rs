//! Cross-origin access for browser clients.

use tower_http::cors::CorsLayer;

/// Allows any origin, method and header.
///
/// Every endpoint is public and unauthenticated, so there is nothing for a
/// restrictive policy to protect.
pub fn layer() -> CorsLayer {
    CorsLayer::permissive()
}
