//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::BlogApi;
pub use error::BlogError;
pub use model::{
    Audit, AuthContext, Category, CategoryPatch, CategoryQuery, NewCategory, NewPost,
    NewSubcategory, NewTag, Page, PageRequest, Post, PostDetails, PostPatch, PostQuery,
    PublishedPost, SlugStatus, Subcategory, SubcategoryPatch, SubcategoryQuery, Tag, TagPatch,
    TagQuery, TocEntry,
};
