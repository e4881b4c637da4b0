//! Show a one-page quiz attempt a few questions at a time.
//!
//! [`controller::init`] discovers the questions on an attempt page, hides all
//! but the current window, clones the finish button into previous/next
//! controls, and keeps the window in step with `#question-<attempt>-<slot>`
//! fragments. The page itself is reached through the [`host::Host`] trait:
//! [`dom::Document`] is an in-memory page, `web::WebHost` the browser one.

pub mod anchor;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod host;
pub mod lang;
pub mod model;
pub mod page;
pub mod parser;
pub mod persist;
pub mod window;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controller::{init, Direction, PaginationController, SharedController};
pub use error::PaginateError;
pub use host::Host;
pub use window::{QuestionsPerPage, Window};
