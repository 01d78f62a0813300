//! Scoring policies and the registry that resolves them.
//!
//! Scoring is a strategy seam: the game reports scoring events to a
//! [`PointsPolicy`] and never touches scores directly. Policies are
//! resolved by name through a [`PointsRegistry`] at construction time, so
//! the policy in use is explicit configuration, not a discovery mechanism.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::GameError;
use crate::player::Player;

/// Name of the policy every registry ships with.
pub const DEFAULT_POLICY: &str = "default";

/// A scoring rule set.
///
/// Implementations must be safe to call from both the input path and the
/// auto-movement task; [`Player`] score updates are atomic, so stateless
/// policies need no further synchronization.
pub trait PointsPolicy: Send + Sync {
    /// A player consumed a pellet worth `value` points.
    fn pellet_consumed(&self, player: &Player, value: u32);
}

impl std::fmt::Debug for dyn PointsPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn PointsPolicy")
    }
}

/// The stock policy: every pellet is worth its face value.
#[derive(Debug, Default)]
pub struct DefaultPointsPolicy;

impl PointsPolicy for DefaultPointsPolicy {
    fn pellet_consumed(&self, player: &Player, value: u32) {
        player.add_points(value);
    }
}

/// Constructor for a policy instance.
type PolicyCtor = fn() -> Arc<dyn PointsPolicy>;

/// Maps policy names to constructors.
///
/// The orchestrator loads exactly one policy per session from here; games
/// built for testing can register their own.
pub struct PointsRegistry {
    constructors: HashMap<&'static str, PolicyCtor>,
}

impl PointsRegistry {
    /// Creates a registry with the built-in `"default"` policy.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
        };
        registry.register(DEFAULT_POLICY, || Arc::new(DefaultPointsPolicy));
        registry
    }

    /// Registers a policy under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, ctor: PolicyCtor) {
        self.constructors.insert(name, ctor);
    }

    /// Resolves and instantiates the policy registered under `name`.
    pub fn load(&self, name: &str) -> Result<Arc<dyn PointsPolicy>, GameError> {
        let ctor = self
            .constructors
            .get(name)
            .ok_or_else(|| GameError::UnknownPointsPolicy(name.to_string()))?;
        tracing::debug!(policy = name, "points policy loaded");
        Ok(ctor())
    }
}

impl Default for PointsRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sprites::SpriteStore;
    use crate::PlayerFactory;

    #[test]
    fn test_default_policy_adds_face_value() {
        let player = PlayerFactory::new(Arc::new(SpriteStore::new())).create_player();
        DefaultPointsPolicy.pellet_consumed(&player, 10);
        assert_eq!(player.score(), 10);
    }

    #[test]
    fn test_registry_loads_builtin() {
        let registry = PointsRegistry::with_builtins();
        assert!(registry.load(DEFAULT_POLICY).is_ok());
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        let registry = PointsRegistry::with_builtins();
        let err = registry.load("double-or-nothing").unwrap_err();
        assert!(matches!(err, GameError::UnknownPointsPolicy(_)));
        assert!(err.to_string().contains("double-or-nothing"));
    }

    #[test]
    fn test_registered_policy_overrides() {
        struct Doubler;
        impl PointsPolicy for Doubler {
            fn pellet_consumed(&self, player: &Player, value: u32) {
                player.add_points(value * 2);
            }
        }

        let mut registry = PointsRegistry::with_builtins();
        registry.register("doubler", || Arc::new(Doubler));
        let policy = registry.load("doubler").unwrap();

        let player = PlayerFactory::new(Arc::new(SpriteStore::new())).create_player();
        policy.pellet_consumed(&player, 10);
        assert_eq!(player.score(), 20);
    }
}
