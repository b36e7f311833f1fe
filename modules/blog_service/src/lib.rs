//! Blog Service Module
//!
//! Content management for a blog: posts with rich editor content, organized
//! by categories, subcategories and tags, plus a read-only view of published
//! posts for the public site.

// Public exports
pub mod contract;
pub use contract::{
    AuthContext, BlogApi, BlogError, Category, Page, PageRequest, Post, PostDetails, PostQuery,
    PublishedPost, SlugStatus, Subcategory, Tag, TocEntry,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::BlogServiceModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
