use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use sha2::{Digest, Sha256};

/// Cache-busting paths for files under `static/`: the URL carries a
/// content hash so browsers pick up redeployed assets. Missing files
/// fall back to the plain path.
#[derive(Debug, Default)]
pub struct AssetCache {
    cache: RwLock<HashMap<String, String>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hashed_path(&self, path: &str) -> String {
        if let Some(hashed) = self.cache.read().unwrap().get(path) {
            return hashed.clone();
        }

        let file_path = Path::new("static").join(path);
        match fs::read(file_path) {
            Ok(contents) => {
                let hash = Sha256::digest(contents);
                let hashed = format!("/static/{}?v={:x}", path, hash);
                self.cache
                    .write()
                    .unwrap()
                    .insert(path.to_string(), hashed.clone());
                hashed
            }
            Err(_) => format!("/static/{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AssetCache;

    #[test]
    fn missing_asset_keeps_plain_path() {
        let cache = AssetCache::new();
        assert_eq!(
            cache.hashed_path("no-such-file.css"),
            "/static/no-such-file.css"
        );
    }
}
