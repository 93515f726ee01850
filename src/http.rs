//! Downstream HTTP helpers shared by every node that calls another node.

use crate::error::{ShopError, ShopResult};

use reqwest::Url;
use std::time::Duration;

/// Per-call budget for every downstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Joins `segments` onto `base`, percent-encoding each one.
///
/// Topics such as `distributed systems` travel in the path, so segments are never
/// spliced in with `format!`.
pub fn endpoint_url(base: &str, segments: &[&str]) -> ShopResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ShopError::InvalidConfig(format!("invalid endpoint '{}': {}", base, e)))?;

    url.path_segments_mut()
        .map_err(|_| ShopError::InvalidConfig(format!("endpoint '{}' cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
