//! Transport trait implemented by the REST client and by test doubles.

use crate::error::ErrorInfo;
use crate::request::Request;
use crate::response::{Response, ServerStatus};
use async_trait::async_trait;

/// Sends one request to the backend.
///
/// Implementations make a single attempt per call and never retry. Every
/// failure mode is normalized into [`ErrorInfo`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request's operation.
    async fn send(&self, request: Request) -> Result<Response, ErrorInfo>;

    /// Probe backend reachability.
    async fn status(&self) -> Result<ServerStatus, ErrorInfo>;
}
