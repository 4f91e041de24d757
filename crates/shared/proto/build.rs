//! Generates the auth provider client and server stubs.
//!
//! Messages are declared by hand in `src/lib.rs`, so no `protoc` is needed at
//! build time.

use tonic_build::manual::{Builder, Method, Service};

fn method(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::auth::{}", input))
        .output_type(format!("crate::auth::{}", output))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    let auth_provider = Service::builder()
        .name("AuthProvider")
        .package("auth")
        .method(method(
            "register_credentials",
            "RegisterCredentials",
            "RegisterCredentialsRequest",
            "RegisterCredentialsResponse",
        ))
        .method(method(
            "revoke_credentials",
            "RevokeCredentials",
            "RevokeCredentialsRequest",
            "RevokeCredentialsResponse",
        ))
        .method(method("login", "Login", "LoginRequest", "TokenReply"))
        .method(method(
            "verify_token",
            "VerifyToken",
            "VerifyTokenRequest",
            "VerifyTokenResponse",
        ))
        .method(method(
            "refresh_token",
            "RefreshToken",
            "RefreshTokenRequest",
            "TokenReply",
        ))
        .build();

    Builder::new().compile(&[auth_provider]);
}
