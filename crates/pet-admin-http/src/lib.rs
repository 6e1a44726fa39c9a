//! HTTP adapters for Pet Admin
//!
//! `reqwest` implementations of the core ports:
//! - [`HttpRecordStore`]: `GET`/`PUT {base}/api/pet/{id}`
//! - [`HttpTaxonomySource`]: `GET {taxonomy_url}`

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod record_store;
pub mod taxonomy;

pub use client::{build_client, parse_url, ClientError};
pub use record_store::HttpRecordStore;
pub use taxonomy::HttpTaxonomySource;
