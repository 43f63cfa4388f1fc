//! Radix-trie router
//!
//! Uses matchit for path matching with support for:
//! - Static paths: /
//! - Wildcards: /static/{*path}

use crate::{Error, Method, Result};
use std::collections::HashMap;

/// Route match result
#[derive(Debug, Clone)]
pub struct RouteMatch<T> {
    /// The matched handler/value
    pub value: T,
    /// Captured path parameters
    pub params: HashMap<String, String>,
}

/// Per-method router using matchit
struct MethodRouter<T> {
    router: matchit::Router<T>,
}

impl<T: Clone> MethodRouter<T> {
    fn new() -> Self {
        Self {
            router: matchit::Router::new(),
        }
    }

    fn insert(&mut self, path: &str, value: T) -> Result<()> {
        self.router
            .insert(path, value)
            .map_err(|e| Error::InvalidRoute(e.to_string()))
    }

    fn at(&self, path: &str) -> Option<RouteMatch<T>> {
        self.router.at(path).ok().map(|matched| {
            let params = matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            RouteMatch {
                value: matched.value.clone(),
                params,
            }
        })
    }
}

/// HTTP router
///
/// Routes are organized by HTTP method for O(1) method dispatch,
/// then matched using a radix trie. The page server only registers
/// GET routes; HEAD requests fall back to them.
pub struct Router<T> {
    get: MethodRouter<T>,
    head: MethodRouter<T>,
}

impl<T: Clone> Router<T> {
    /// Create a new router
    pub fn new() -> Self {
        Self {
            get: MethodRouter::new(),
            head: MethodRouter::new(),
        }
    }

    /// Add a route
    pub fn route(&mut self, method: Method, path: &str, value: T) -> Result<()> {
        match method {
            Method::Get => self.get.insert(path, value),
            Method::Head => self.head.insert(path, value),
            _ => Err(Error::InvalidMethod(method.to_string())),
        }
    }

    /// Add a GET route
    pub fn get(&mut self, path: &str, value: T) -> Result<()> {
        self.route(Method::Get, path, value)
    }

    /// Match a request
    pub fn match_route(&self, method: Method, path: &str) -> Option<RouteMatch<T>> {
        match method {
            Method::Get => self.get.at(path),
            // HEAD falls back to GET; hyper strips the body on the way out
            Method::Head => self.head.at(path).or_else(|| self.get.at(path)),
            _ => None,
        }
    }
}

impl<T: Clone> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}
