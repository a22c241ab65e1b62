//! Mocked websites for scanner and monitor tests

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// How the mocked site behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteProfile {
    /// Full header set, tight CSP, sane caching, Cloudflare fingerprints
    Hardened,
    /// Plain 200 responses with no security headers
    Bare,
}

/// Start a mock site for `profile`; unmatched paths answer 404
pub async fn mock_site(profile: SiteProfile) -> MockServer {
    let server = MockServer::start().await;
    match profile {
        SiteProfile::Hardened => {
            Mock::given(method("GET"))
                .and(path("/"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .insert_header("strict-transport-security", "max-age=31536000; includeSubDomains")
                        .insert_header("x-content-type-options", "nosniff")
                        .insert_header("x-frame-options", "DENY")
                        .insert_header("referrer-policy", "strict-origin-when-cross-origin")
                        .insert_header("permissions-policy", "camera=(), microphone=()")
                        .insert_header(
                            "content-security-policy",
                            "default-src 'self'; script-src 'self'; object-src 'none'",
                        )
                        .insert_header("cache-control", "public, max-age=0, must-revalidate")
                        .insert_header("content-encoding", "br")
                        .insert_header("cf-ray", "8a1b2c3d4e5f-AMS")
                        .insert_header("cf-cache-status", "HIT")
                        .insert_header("x-ratelimit-limit", "100")
                        .insert_header("content-type", "text/html")
                        .set_body_string("<!doctype html><title>ok</title>"),
                )
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/favicon.ico"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .insert_header("cache-control", "public, max-age=31536000, immutable"),
                )
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/api/health"))
                .respond_with(ResponseTemplate::new(200).insert_header("cache-control", "no-store"))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/index.html"))
                .respond_with(ResponseTemplate::new(200).insert_header("cf-cache-status", "MISS"))
                .mount(&server)
                .await;
        }
        SiteProfile::Bare => {
            Mock::given(method("GET"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .insert_header("server", "nginx/1.18.0")
                        .insert_header("x-powered-by", "Express"),
                )
                .mount(&server)
                .await;
        }
    }
    server
}
