pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{char_len, collapse_whitespace, preview, safe_truncate_chars};
pub use url_utils::{extract_domain, host_matches, is_valid_url};
