//! Configuration for blog service module

use serde::{Deserialize, Serialize};

/// Blog service configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Name of the category created at start-up when none is marked default
    #[serde(default = "default_category_name")]
    pub default_category_name: String,

    /// Field length limits
    #[serde(default)]
    pub limits: Limits,

    /// Pagination defaults for list endpoints
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Characters of plain text used for post excerpts
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    /// Bearer token verification for admin routes
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_category_name: default_category_name(),
            limits: Limits::default(),
            pagination: PaginationConfig::default(),
            excerpt_length: default_excerpt_length(),
            auth: AuthConfig::default(),
        }
    }
}

/// Maximum lengths, counted in characters
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct Limits {
    pub category_name: usize,
    pub subcategory_name: usize,
    pub tag_name: usize,
    pub post_title: usize,
    pub slug: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            category_name: 50,
            subcategory_name: 50,
            tag_name: 30,
            post_title: 200,
            slug: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct PaginationConfig {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            max_per_page: 100,
        }
    }
}

/// JWT verification settings
///
/// Tokens are issued by the hosted identity provider and signed with HS256.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Disable to accept every admin request (local development only)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Shared HS256 secret
    #[serde(default)]
    pub jwt_secret: String,

    /// Expected `iss` claim
    #[serde(default)]
    pub issuer: Option<String>,

    /// Expected `aud` claim
    #[serde(default)]
    pub audience: Option<String>,

    /// Role that must appear in the `roles` claim
    #[serde(default)]
    pub required_role: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jwt_secret: String::new(),
            issuer: None,
            audience: None,
            required_role: None,
        }
    }
}

fn default_category_name() -> String {
    "Uncategorized".to_string()
}

fn default_excerpt_length() -> usize {
    200
}

fn default_true() -> bool {
    true
}
