//! In-process stand-ins for integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::TokenResponse;

use crate::client::AuthProvider;
use crate::infra::Database;
use crate::service::Services;

#[derive(Default)]
struct FakeState {
    /// email -> (credential id, password)
    credentials: HashMap<String, (Uuid, String)>,
    /// token -> credential id
    tokens: HashMap<String, Uuid>,
}

/// Auth provider keeping credentials and tokens in memory.
///
/// Tokens are opaque random strings. Revoking a credential invalidates its
/// tokens, like the real provider.
#[derive(Clone, Default)]
pub struct FakeAuthProvider {
    state: Arc<Mutex<FakeState>>,
}

impl FakeAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials
    pub fn credential_count(&self) -> usize {
        self.lock().credentials.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn issue(state: &mut FakeState, credential_id: Uuid) -> TokenResponse {
        let token = Uuid::new_v4().simple().to_string();
        state.tokens.insert(token.clone(), credential_id);
        TokenResponse::bearer(token, 3600)
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn register_credentials(&self, email: &str, password: &str) -> AppResult<Uuid> {
        let mut state = self.lock();
        if state.credentials.contains_key(email) {
            return Err(AppError::conflict("email already registered"));
        }
        let credential_id = Uuid::new_v4();
        state
            .credentials
            .insert(email.to_string(), (credential_id, password.to_string()));
        Ok(credential_id)
    }

    async fn revoke_credentials(&self, credential_id: Uuid) -> AppResult<()> {
        let mut state = self.lock();
        state.credentials.retain(|_, (id, _)| *id != credential_id);
        state.tokens.retain(|_, id| *id != credential_id);
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let mut state = self.lock();
        let credential_id = match state.credentials.get(email) {
            Some((id, stored)) if stored == password => *id,
            _ => return Err(AppError::InvalidCredentials),
        };
        Ok(Self::issue(&mut state, credential_id))
    }

    async fn verify_token(&self, token: &str) -> AppResult<Option<Uuid>> {
        Ok(self.lock().tokens.get(token).copied())
    }

    async fn refresh_token(&self, token: &str) -> AppResult<TokenResponse> {
        let mut state = self.lock();
        let credential_id = *state.tokens.get(token).ok_or(AppError::Unauthorized)?;
        Ok(Self::issue(&mut state, credential_id))
    }
}

/// Services over a fresh in-memory database and a [`FakeAuthProvider`].
pub async fn in_memory_services() -> AppResult<(Services, FakeAuthProvider)> {
    let db = Database::connect_in_memory().await?;
    let auth = FakeAuthProvider::new();
    let services = Services::new(db, Arc::new(auth.clone()), Duration::from_secs(5));
    Ok((services, auth))
}
