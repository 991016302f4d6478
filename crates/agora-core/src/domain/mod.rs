//! Domain entities - the core business objects.

mod category;
mod post;
mod slug;
mod user;

pub use category::{Category, NewCategory};
pub use post::{
    Attachable, MAX_TITLE_LEN, Owned, Post, PostDraft, PostPatch, listing_order,
};
pub use slug::slugify;
pub use user::{Role, UnknownRole, User};
