//! gRPC implementation of the auth provider contract.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use uuid::Uuid;

use crate::service::AuthService;
use common::AppError;
use domain::TokenResponse;
use proto::auth::{
    auth_provider_server::AuthProvider, LoginRequest, RefreshTokenRequest,
    RegisterCredentialsRequest, RegisterCredentialsResponse, RevokeCredentialsRequest,
    RevokeCredentialsResponse, TokenReply, VerifyTokenRequest, VerifyTokenResponse,
};

/// gRPC service wrapper for the authenticator.
pub struct AuthGrpcService {
    service: Arc<dyn AuthService>,
}

impl AuthGrpcService {
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }
}

fn token_reply(token: TokenResponse) -> TokenReply {
    TokenReply {
        access_token: token.access_token,
        token_type: token.token_type,
        expires_in: token.expires_in,
    }
}

#[tonic::async_trait]
impl AuthProvider for AuthGrpcService {
    async fn register_credentials(
        &self,
        request: Request<RegisterCredentialsRequest>,
    ) -> Result<Response<RegisterCredentialsResponse>, Status> {
        let req = request.into_inner();

        let credential_id = self.service.register(req.email, req.password).await?;

        Ok(Response::new(RegisterCredentialsResponse {
            credential_id: credential_id.to_string(),
        }))
    }

    async fn revoke_credentials(
        &self,
        request: Request<RevokeCredentialsRequest>,
    ) -> Result<Response<RevokeCredentialsResponse>, Status> {
        let req = request.into_inner();
        let credential_id = Uuid::parse_str(&req.credential_id)
            .map_err(|_| AppError::validation("Invalid credential id"))?;

        let revoked = self.service.revoke(credential_id).await?;

        Ok(Response::new(RevokeCredentialsResponse { revoked }))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<TokenReply>, Status> {
        let req = request.into_inner();

        let token = self.service.login(req.email, req.password).await?;

        Ok(Response::new(token_reply(token)))
    }

    async fn verify_token(
        &self,
        request: Request<VerifyTokenRequest>,
    ) -> Result<Response<VerifyTokenResponse>, Status> {
        let req = request.into_inner();

        // Rejected tokens are a normal answer, not a transport error.
        // Store failures still surface as errors.
        match self.service.verify_token(&req.token).await {
            Ok(claims) => Ok(Response::new(VerifyTokenResponse {
                valid: true,
                subject: claims.sub.to_string(),
            })),
            Err(err) if err.status().is_client_error() => {
                Ok(Response::new(VerifyTokenResponse {
                    valid: false,
                    subject: String::new(),
                }))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn refresh_token(
        &self,
        request: Request<RefreshTokenRequest>,
    ) -> Result<Response<TokenReply>, Status> {
        let req = request.into_inner();

        let token = self.service.refresh_token(&req.token).await?;

        Ok(Response::new(token_reply(token)))
    }
}
