//! # Blogly Shared
//!
//! Request types shared by the HTTP layer: urlencoded form fields and their
//! validated, typed counterparts.

pub mod forms;

pub use forms::{FormFields, PostForm, TagForm, UserForm, ValidationErrors};
