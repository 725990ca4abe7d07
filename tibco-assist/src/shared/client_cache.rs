use crate::shared::completion::CompletionProvider;
use lazy_static::lazy_static;
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

lazy_static! {
    /// Clients shared for the lifetime of the process.
    pub static ref CLIENT_CACHE: ClientCache = ClientCache::default();
}

/// Completion clients memoized per credential.
///
/// Entries are keyed by a SHA-256 digest, the raw credential is never stored.
#[derive(Default)]
pub struct ClientCache {
    clients: Mutex<BTreeMap<String, Arc<dyn CompletionProvider>>>,
}

impl ClientCache {
    /// Return the client for `credential`, building it with `create` on first use.
    pub fn get_or_try_insert_with<F, E>(
        &self,
        credential: &SecretString,
        create: F,
    ) -> Result<Arc<dyn CompletionProvider>, E>
    where
        F: FnOnce() -> Result<Arc<dyn CompletionProvider>, E>,
    {
        let key = cache_key(credential);
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(client) = clients.get(&key) {
            debug!("Reusing completion client {}", &key[..8]);
            return Ok(client.clone());
        }

        let client = create()?;
        debug!("Created completion client {}", &key[..8]);
        clients.insert(key, client.clone());
        Ok(client)
    }

    pub fn len(&self) -> usize {
        self.clients.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cache_key(credential: &SecretString) -> String {
    sha256::digest(credential.expose_secret())
}
