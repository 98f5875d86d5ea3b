use std::net::IpAddr;

use poem::Request;

use crate::types::internal::auth::AuthenticatedUser;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries what is needed to correlate log lines for one operation
/// across the API, coordinator and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request
    pub request_id: RequestId,

    /// Whether the operation came in over HTTP or from the CLI
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Create an anonymous API context from the incoming request
    pub fn from_request(req: &Request) -> Self {
        Self {
            ip_address: Self::extract_ip_address(req),
            request_id: RequestId::new(),
            source: RequestSource::API,
            actor_id: "anonymous".to_owned(),
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Attribute the context to an authenticated user
    pub fn with_user(mut self, user: &AuthenticatedUser) -> Self {
        self.actor_id = format!("user:{}", user.id);
        self
    }

    /// Client address for log fields, `-` when unknown
    pub fn client_ip(&self) -> String {
        self.ip_address.map_or_else(|| "-".to_owned(), |ip| ip.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let req = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .finish();

        let ctx = RequestContext::from_request(&req);

        assert_eq!(ctx.ip_address, Some("203.0.113.7".parse().unwrap()));
        assert_eq!(ctx.source, RequestSource::API);
    }

    #[test]
    fn test_with_user_sets_actor() {
        let user = AuthenticatedUser {
            id: 42,
            email: "owner@example.com".to_string(),
            roles: vec!["business_owner".to_string()],
        };

        let req = Request::builder().finish();
        let ctx = RequestContext::from_request(&req).with_user(&user);

        assert_eq!(ctx.actor_id, "user:42");
    }

    #[test]
    fn test_cli_context() {
        let ctx = RequestContext::for_cli("catalog");

        assert_eq!(ctx.source, RequestSource::CLI);
        assert_eq!(ctx.actor_id, "cli:catalog");
        assert!(ctx.ip_address.is_none());
        assert_eq!(ctx.client_ip(), "-");
    }
}
