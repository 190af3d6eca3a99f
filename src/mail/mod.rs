pub mod decode;
pub mod gmail;

pub use gmail::{GmailClient, MailApi};
