use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::fmt::Debug;
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// It holds one credential that is loaded once and never mutated, so a
/// `Signer` can be cloned and shared across tasks freely.
#[derive(Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    credential: Arc<K>,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Clone for Signer<K> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            credential: self.credential.clone(),
            builder: self.builder.clone(),
        }
    }
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer with an already loaded credential.
    pub fn new(ctx: Context, credential: K, builder: impl SignRequest<Credential = K>) -> Self {
        Self {
            ctx,
            credential: Arc::new(credential),
            builder: Arc::new(builder),
        }
    }

    /// Load the credential via `loader` once and create a new signer.
    ///
    /// Fails with [`crate::ErrorKind::CredentialInvalid`] if the loader finds
    /// nothing or returns an invalid credential.
    pub async fn load(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Result<Self> {
        let credential = loader
            .provide_credential(&ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no credential found"))?;
        if !credential.is_valid() {
            return Err(Error::credential_invalid(format!(
                "loaded credential is not valid: {credential:?}"
            )));
        }

        Ok(Self::new(ctx, credential, builder))
    }

    /// The context this signer was built with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The credential used to sign requests.
    pub fn credential(&self) -> &K {
        &self.credential
    }

    /// Signing request.
    pub fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        self.builder.sign_request(req, body, &self.credential)
    }
}
