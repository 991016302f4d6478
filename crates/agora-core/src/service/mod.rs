//! Application services - access rules applied against the repository ports.

mod categories;
mod posts;

pub use categories::CategoryService;
pub use posts::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, NewPostInput, PostFilter, PostService, PostUpdateInput};
