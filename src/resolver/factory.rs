//! resolver::factory
//!
//! Resolver creation from configuration.
//!
//! # Design
//!
//! Callers build resolvers here instead of wiring collaborators by hand, so
//! the `[api]` and `[naming]` settings are applied in one place.
//!
//! # Example
//!
//! ```
//! use dagpath::core::config::Config;
//! use dagpath::resolver::{create_remote_resolver, PathResolver};
//!
//! let resolver = create_remote_resolver(&Config::default()).unwrap();
//! assert_eq!(resolver.name(), "remote");
//! assert!(resolver.has_names());
//! ```

use std::sync::Arc;

use super::local::LocalResolver;
use super::remote::RemoteResolver;
use crate::core::config::Config;
use crate::naming::{MemoryNameSystem, NameResolver};
use crate::rpc::{RpcClient, RpcError};
use crate::store::DagStore;

/// Create a remote resolver for the API configured in `config`.
///
/// The RPC client serves as procedure, store and (unless naming is disabled)
/// name resolver.
///
/// # Errors
///
/// `RpcError::InvalidConfig` if the client cannot be built from the
/// configured auth header or timeout.
pub fn create_remote_resolver(config: &Config) -> Result<RemoteResolver, RpcError> {
    let resolver = RemoteResolver::from_client(RpcClient::from_config(config)?);
    if config.naming_enabled() {
        Ok(resolver)
    } else {
        Ok(resolver.without_names())
    }
}

/// Create a local resolver over `store`.
///
/// With naming enabled, `names` is used when given; otherwise an empty
/// in-memory name system limited to the configured depth is attached. With
/// naming disabled, no name resolver is attached at all.
pub fn create_local_resolver(
    config: &Config,
    store: Arc<dyn DagStore>,
    names: Option<Arc<dyn NameResolver>>,
) -> LocalResolver {
    let names = if config.naming_enabled() {
        Some(names.unwrap_or_else(|| {
            Arc::new(MemoryNameSystem::with_max_depth(config.naming_max_depth()))
        }))
    } else {
        None
    };
    LocalResolver::new(store, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::schema::{ApiConfig, NamingConfig, Settings};
    use crate::resolver::PathResolver;
    use crate::store::MemoryDagStore;

    fn config(naming_enabled: bool) -> Config {
        Config::from_settings(Settings {
            api: Some(ApiConfig {
                url: Some("http://10.0.0.1:5001".into()),
                ..Default::default()
            }),
            naming: Some(NamingConfig {
                enabled: Some(naming_enabled),
                max_depth: Some(4),
            }),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn remote_honors_naming_switch() {
        assert!(create_remote_resolver(&config(true)).unwrap().has_names());
        assert!(!create_remote_resolver(&config(false)).unwrap().has_names());
    }

    #[test]
    fn local_honors_naming_switch() {
        let store: Arc<dyn DagStore> = Arc::new(MemoryDagStore::new());
        let enabled = create_local_resolver(&config(true), Arc::clone(&store), None);
        assert!(enabled.has_names());
        assert_eq!(enabled.name(), "local");

        let disabled = create_local_resolver(
            &config(false),
            store,
            Some(Arc::new(MemoryNameSystem::new())),
        );
        assert!(!disabled.has_names());
    }

    #[test]
    fn invalid_auth_surfaces_as_error() {
        let mut config = Config::default();
        config.settings.api = Some(ApiConfig {
            auth: Some("line\nbreak".into()),
            ..Default::default()
        });
        assert!(matches!(
            create_remote_resolver(&config),
            Err(RpcError::InvalidConfig(_))
        ));
    }
}
