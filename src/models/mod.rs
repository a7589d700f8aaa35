//! Data structures for users, ride posts, and reports.

mod post;
mod report;
mod user;

pub use post::{NewPost, Post};
pub use report::Report;
pub use user::User;
