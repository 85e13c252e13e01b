// Page CMS: versioned section content and per-section image sets.
// Reads collapse "absent" and "failed" into one fallback signal; admin
// writes go through `AdminUser` and touch one table each.

pub mod handlers;
pub mod images;
pub mod resolver;
pub mod validation;
