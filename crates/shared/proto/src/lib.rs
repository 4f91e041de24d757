//! gRPC protocol definitions.
//!
//! This crate contains the contract of the authentication provider:
//! - credential registration and revocation
//! - login, token verification and refresh

/// Authentication provider definitions.
pub mod auth {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RegisterCredentialsRequest {
        #[prost(string, tag = "1")]
        pub email: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub password: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RegisterCredentialsResponse {
        /// Opaque reference to the stored credential
        #[prost(string, tag = "1")]
        pub credential_id: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RevokeCredentialsRequest {
        #[prost(string, tag = "1")]
        pub credential_id: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RevokeCredentialsResponse {
        #[prost(bool, tag = "1")]
        pub revoked: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct LoginRequest {
        #[prost(string, tag = "1")]
        pub email: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub password: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TokenReply {
        #[prost(string, tag = "1")]
        pub access_token: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub token_type: ::prost::alloc::string::String,
        /// Seconds until expiry
        #[prost(int64, tag = "3")]
        pub expires_in: i64,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct VerifyTokenRequest {
        #[prost(string, tag = "1")]
        pub token: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct VerifyTokenResponse {
        #[prost(bool, tag = "1")]
        pub valid: bool,
        /// Credential id the token was issued for; empty when invalid
        #[prost(string, tag = "2")]
        pub subject: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RefreshTokenRequest {
        #[prost(string, tag = "1")]
        pub token: ::prost::alloc::string::String,
    }

    include!(concat!(env!("OUT_DIR"), "/auth.AuthProvider.rs"));
}

// Re-export commonly used items
pub use auth::auth_provider_client::AuthProviderClient;
pub use auth::auth_provider_server::{AuthProvider, AuthProviderServer};
