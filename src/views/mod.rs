//! Views bound to request paths
//!
//! A view takes the request and the shared state and returns a response, or
//! the render error unchanged for the router's error layer to deal with.

mod hello;

pub use hello::hello_world;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use serde::Deserialize;

use crate::config::AppState;
use crate::templates::TemplateError;

/// Views that can be bound to a path in `[routes.views]`
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum View {
    HelloWorld,
}

impl View {
    pub fn call<B>(
        self,
        request: &Request<B>,
        state: &AppState,
    ) -> Result<Response<Full<Bytes>>, TemplateError> {
        match self {
            Self::HelloWorld => hello_world(request, state),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::HelloWorld => "hello_world",
        }
    }
}
