pub(crate) mod comment;
pub(crate) mod contact;
pub(crate) mod error;
pub(crate) mod identity;
pub(crate) mod post;
pub(crate) mod user;
