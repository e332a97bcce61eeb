pub use super::categories::Entity as Categories;
pub use super::comments::Entity as Comments;
pub use super::likes::Entity as Likes;
pub use super::stories::Entity as Stories;
pub use super::users::Entity as Users;
