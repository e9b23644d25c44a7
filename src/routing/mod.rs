//! Route declaration and middleware composition.
//!
//! A [`Route`] names a method, a path pattern, a terminal [`Handler`] and an
//! ordered list of [`Middleware`]s. Registering it compiles the whole chain
//! once into a single handler stored in a [`DispatchTable`], which is then
//! turned into the axum [`Router`](axum::Router) that serves requests.
//!
//! For a route declared with middlewares `[A, B]` a request runs
//! `A -> B -> Baseline -> handler`, and the response flows back out in
//! reverse.

pub mod baseline;
pub mod handler;
pub mod route;
pub mod table;

pub use baseline::Baseline;
pub use handler::{Handler, Middleware};
pub use route::{Route, RouteError};
pub use table::DispatchTable;
