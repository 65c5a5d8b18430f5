//! Client-side domain of the Connexa referrals network.
//!
//! Everything here is target independent: record shapes owned by the remote
//! API, the `{data, error, meta}` envelope, the identity session, the generic
//! paginated list and the mutation workflows. Transport lives in
//! `connexa-api`; rendering lives in `connexa-ui`.

#![allow(async_fn_in_trait)]

pub mod actions;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod models;
pub mod notice;
pub mod paging;
pub mod session;

pub use envelope::{Envelope, Meta, Page};
pub use error::ActionError;
pub use session::{Admin, AdminSession, Member, MemberSession, Role, Session};
