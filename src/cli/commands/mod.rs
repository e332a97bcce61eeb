mod admin;
mod categories;

pub use admin::cmd_create_admin;
pub use categories::cmd_categories;
