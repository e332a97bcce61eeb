pub mod prelude;

pub mod categories;
pub mod comments;
pub mod likes;
pub mod stories;
pub mod users;
