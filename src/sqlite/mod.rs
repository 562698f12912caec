//! `SQLite` backend for the invitation store.
//!
//! Enable the `sqlx_sqlite` feature (on by default) and run
//! [`migrations::run`] once before using [`SqliteInvitationStore`].

mod invitation;
pub mod migrations;

pub use invitation::SqliteInvitationStore;
