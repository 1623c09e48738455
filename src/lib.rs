//! # bigmachines-client
//!
//! Rust client for the BigMachines commerce/CPQ SOAP web services.
//!
//! The API is split into two contracts served from one endpoint:
//!
//! - **Security**: login, logout, user info, session currency
//! - **Commerce**: transactions and their file attachments
//!
//! A [`Client`] logs in once, keeps the session id, and sends it in the
//! SOAP header of every later call. Responses are unwrapped from their
//! `<operationName>Response` element; an embedded `status.success == false`
//! becomes [`BigMachinesError::RemoteOperation`].
//!
//! ## Example
//!
//! ```ignore
//! use bigmachines_client::{Client, ExportOptions, ExportedAttachments};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::builder("acme").build()?;
//!     client.login("alice", "secret").await?;
//!
//!     match client.get_attachment(26539349, "quote_pdf", ExportOptions::default()).await? {
//!         ExportedAttachments::Mime(file) => println!("{} bytes", file.content.len()),
//!         ExportedAttachments::Listed(files) => println!("{} attachments", files.len()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod requests;
pub mod response;
pub mod transport;

mod client;
mod session;

pub use client::{Client, ClientBuilder, ExportOptions};
pub use config::ClientConfig;
pub use error::{BigMachinesError, Result};
pub use model::{Attachment, ExportedAttachments, MimeAttachment, Transaction, UserInfo};
pub use protocol::ServiceCategory;
pub use response::{CallResult, MultiPart};
pub use session::Session;
