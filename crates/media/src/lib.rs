//! Media URL and type helpers.
//!
//! - **Photon**: resizing-proxy URLs via [`build_photon_url`] and [`PhotonBuilder`]
//! - **URLs**: query, fragment and scheme helpers in [`url_utils`]
//! - **Media types**: extension and MIME helpers in [`media`]
//!
//! # Example
//!
//! ```
//! use wputils_media::{PhotonRequest, Quality, build_photon_url};
//!
//! let request = PhotonRequest::new(100, 50).with_quality(Quality::High);
//! let url = build_photon_url(Some("https://example.com/a.jpg"), &request);
//! assert!(url.starts_with("https://i0.wp.com/example.com/a.jpg?"));
//! assert!(url.contains("quality=100"));
//! ```

pub mod media;
pub mod photon;
pub mod url_utils;

pub use media::{MediaKind, extension_for_mime_type, media_file_name, media_kind};
pub use photon::{
    PhotonBuilder, PhotonRequest, Quality, build_photon_url, is_mshots_url, simple_photon_url,
};
