use minijinja::{Environment, Error, State};

use crate::util::assets::AssetCache;

/// Builds the shared template environment: templates load from
/// `templates/`, `asset(path)` resolves cache-busted static URLs and
/// `money` formats amounts with two decimals.
pub fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(minijinja::path_loader("templates"));

    let assets = AssetCache::new();
    env.add_function(
        "asset",
        move |_state: &State, path: String| -> Result<String, Error> {
            Ok(assets.hashed_path(&path))
        },
    );
    env.add_filter("money", |amount: f64| format!("{amount:.2}"));

    env
}
