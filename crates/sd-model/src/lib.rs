//! # sd-model
//!
//! Payload types exchanged with the Shelfdesk backend.
//!
//! Users and books are opaque records owned by the backend; the client
//! replaces them wholesale and never patches them in place.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod book;
pub mod page;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use book::{Book, BookQuery, CreateBookRequest, UpdateBookRequest};
pub use page::{Page, PageQuery};
pub use user::{CreateUserRequest, UpdateProfileRequest, UpdateUserRequest, User, UserQuery};
