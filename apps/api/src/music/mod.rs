// Song submissions: public submit + approved listing, admin moderation.

pub mod handlers;
pub mod validation;
