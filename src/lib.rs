//! Filter arXiv digest e-mails from a Gmail inbox into per-subject
//! abstract files. One invocation sweeps the unread inbox once.

pub mod auth;
pub mod config;
pub mod extract;
pub mod mail;
pub mod output;
pub mod processor;
