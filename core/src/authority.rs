use std::collections::BTreeSet;
use std::sync::Mutex;

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use rondo_proto::{InteractionToken, TreeId};

/// The token-issuing authority: process-wide, read-mostly state whose
/// lifecycle spans many requests. Rendering registers every token it
/// emits; dispatch consults `validate` before any payload parsing.
pub trait TokenAuthority: Send + Sync {
    fn register(&self, token: &InteractionToken);

    fn validate(&self, token: &InteractionToken) -> bool;
}

/// Default authority: a per-generation set of token digests. A token
/// validates iff its exact (tree, path, argument) triple was registered
/// when that generation rendered, so forged or cross-session tokens are
/// rejected without parsing their payloads.
pub struct ValidationRegistry {
    generations: DashMap<TreeId, BTreeSet<[u8; 32]>>,
    recent: Mutex<Vec<TreeId>>,
    keep: usize,
}

impl ValidationRegistry {
    /// `keep` bounds how many recent generations stay registered;
    /// a token from an evicted generation fails validation.
    pub fn new(keep: usize) -> Self {
        Self { generations: DashMap::new(), recent: Mutex::new(Vec::new()), keep: keep.max(1) }
    }

    fn digest(token: &InteractionToken) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(token.tree.to_bytes());
        hasher.update([0u8]);
        hasher.update(token.path.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(token.argument.as_bytes());
        hasher.finalize().into()
    }

    fn remember(&self, tree: TreeId) {
        let mut recent = self.recent.lock().unwrap();
        if recent.contains(&tree) {
            return;
        }
        recent.push(tree);
        while recent.len() > self.keep {
            let evicted = recent.remove(0);
            self.generations.remove(&evicted);
            debug!("authority: evicted generation {}", evicted);
        }
    }
}

impl Default for ValidationRegistry {
    fn default() -> Self { Self::new(8) }
}

impl TokenAuthority for ValidationRegistry {
    fn register(&self, token: &InteractionToken) {
        self.remember(token.tree);
        self.generations.entry(token.tree).or_default().insert(Self::digest(token));
    }

    fn validate(&self, token: &InteractionToken) -> bool {
        self.generations
            .get(&token.tree)
            .map(|digests| digests.contains(&Self::digest(token)))
            .unwrap_or(false)
    }
}

/// Accepts everything. For hosts that disable event validation, and for
/// tests that exercise the grammar layers directly.
pub struct NoValidation;

impl TokenAuthority for NoValidation {
    fn register(&self, _token: &InteractionToken) {}

    fn validate(&self, _token: &InteractionToken) -> bool { true }
}
