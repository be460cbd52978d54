// src/constants.rs
//! Domain constants that define the operational boundaries of the relay.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Notion API contract
// ---------------------------------------------------------------------------

/// API version pinned on every outbound request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Root of the Notion REST API. Overridable for tests and proxies.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

// ---------------------------------------------------------------------------
// Inbound surface
// ---------------------------------------------------------------------------

/// Address the server binds to when neither `--bind` nor `PORT` is given.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:9002";

/// Canonical query parameter carrying the Notion token.
pub const TOKEN_PARAM: &str = "api_key";

/// Deprecated alias for [`TOKEN_PARAM`] still found in older shared links.
pub const LEGACY_TOKEN_PARAM: &str = "sak";

/// Query parameter carrying the URL-encoded JSON filter.
pub const FILTER_PARAM: &str = "filter";

/// Key under which the fetch timestamp is merged into JSON responses.
pub const FETCHED_AT_KEY: &str = "dataFetchedAt";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when logging upstream error bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
