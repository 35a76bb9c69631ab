//! Revision store for the Pagewright site pipeline.
//!
//! Owns the fixed set of site files and all mutation of their content:
//! live files, staged preview siblings, and timestamped snapshots under
//! the hidden history directory. No other crate touches the site
//! directory directly.
//!
//! # Layout
//!
//! ```text
//! site/
//! ├── live.html              live content
//! ├── main.js
//! ├── styles.css
//! ├── preview_live.html      staged content (may be absent)
//! └── .history/
//!     └── 1756500000/        one snapshot per version id
//!         ├── live.html
//!         ├── main.js
//!         └── styles.css
//! ```

mod error;
mod site_file;
mod store;
mod version;

pub use error::StoreError;
pub use site_file::SiteFile;
pub use store::RevisionStore;
pub use version::VersionId;
