//! Code numbering.
//!
//! Templates are stored per (domain, type) together with a counter. This
//! module only formats; advancing the counter is a persistence concern.

pub mod fallback;
pub mod template;

#[cfg(test)]
mod template_props;

pub use fallback::{
    JOURNAL_DOMAIN, JOURNAL_PREFIX, JOURNAL_TYPE, document_prefix, fallback_code,
};
pub use template::{CodeTemplate, DEFAULT_PADDING};
