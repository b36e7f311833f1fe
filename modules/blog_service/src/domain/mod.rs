//! Domain layer - business logic and services

pub mod content;
pub mod events;
pub mod repository;
pub mod service;
pub mod slug;
pub mod validation;

pub use events::{ContentEvent, EventPublisher, NoOpEventPublisher, TracingEventPublisher};
pub use repository::{CategoryRepository, PostRepository, SubcategoryRepository, TagRepository};
pub use service::{Repositories, Service};
