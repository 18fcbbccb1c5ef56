mod epoch;

pub use epoch::{EpochCounter, EpochToken};

/// Dependency tracker for a setup/teardown pair
///
/// The owner asks [`Effect::changed`] on every render; when it returns true
/// the owner tears down what the previous commit set up, then runs setup and
/// [`Effect::commit`]s the new dependencies. Teardown of commit N therefore
/// always happens before setup of commit N+1.
#[derive(Debug)]
pub struct Effect<D> {
    deps: Option<D>,
}

impl<D> Effect<D> {
    pub fn new() -> Self {
        Self { deps: None }
    }

    pub fn deps(&self) -> Option<&D> {
        self.deps.as_ref()
    }

    pub fn commit(&mut self, deps: D) {
        self.deps = Some(deps);
    }

    /// Forget the committed dependencies (unmount), returning them for teardown
    pub fn reset(&mut self) -> Option<D> {
        self.deps.take()
    }
}

impl<D: PartialEq> Effect<D> {
    pub fn changed(&self, deps: &D) -> bool {
        self.deps.as_ref() != Some(deps)
    }
}

impl<D> Default for Effect<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_render_always_changes() {
        let effect: Effect<(u32, &str)> = Effect::new();
        assert!(effect.changed(&(1, "bg")));
        assert_eq!(effect.deps(), None);
    }

    #[test]
    fn test_commit_then_same_deps_is_unchanged() {
        let mut effect = Effect::new();
        effect.commit((1, "bg"));
        assert!(!effect.changed(&(1, "bg")));
        assert!(effect.changed(&(1, "fill")));
        assert_eq!(effect.deps(), Some(&(1, "bg")));
    }

    #[test]
    fn test_reset_returns_previous_deps() {
        let mut effect = Effect::new();
        effect.commit("bg");
        assert_eq!(effect.reset(), Some("bg"));
        assert_eq!(effect.deps(), None);
        assert!(effect.changed(&"bg"));
    }
}
