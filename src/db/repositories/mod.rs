pub mod category;
pub mod engagement;
pub mod story;
pub mod user;
