//! Listing collaborator for the kitstock extractors.
//!
//! Wraps the Cloudinary Admin API's cursor-paginated resource listing
//! behind the [`AssetSource`] seam, plus credential loading in the usual
//! env-var-then-config-file order.

pub mod client;
pub mod credentials;
pub mod error;

pub use client::{AssetSource, CloudinaryClient, ListLocation, ListPage, list_all, object_url};
pub use credentials::{
    Credentials, CredentialSource, CredentialSources, config_path, credential_sources,
};
pub use error::SourceError;
