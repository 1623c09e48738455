//! Codec module - XML and multipart encoding/decoding.
//!
//! - [`render_element`] / [`parse_body`] - message trees to and from SOAP XML
//! - [`multipart`] - splitting multipart attachment downloads
//!
//! # Example
//!
//! ```
//! use bigmachines_client::codec::{parse_document, render_element, RenderOptions};
//! use serde_json::json;
//!
//! let xml = render_element("userInfo", &json!({ "username": "alice" }), RenderOptions::wire());
//! assert_eq!(xml, "<bm:userInfo><bm:username>alice</bm:username></bm:userInfo>");
//!
//! let doc = parse_document(xml.as_bytes()).unwrap();
//! assert_eq!(doc["userInfo"]["username"], "alice");
//! ```

pub mod multipart;
mod xml;

pub use xml::{
    parse_body, parse_document, render_element, RenderOptions, ELEMENT_PREFIX, FILTERED,
};
