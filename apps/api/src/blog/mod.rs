// Blog posts: filtered public listing, slug lookup, admin create/delete.

pub mod handlers;
pub mod validation;
