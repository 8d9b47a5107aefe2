pub mod crud;
pub mod list;

pub use crud::{confirm_delete, create, delete, edit_form, new_form, update};
pub use list::list;
