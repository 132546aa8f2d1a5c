use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Key to string lookup against some environment state.
///
/// Returns the value for an exact key, or `None` when it is unset.
pub trait EnvLookup {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The current process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> EnvLookup for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: EnvLookup + ?Sized> EnvLookup for &T {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

impl<T: EnvLookup + ?Sized> EnvLookup for std::sync::Arc<T> {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_lookups() {
        let mut env = HashMap::new();
        env.insert("TEST_PORT".to_owned(), "9009".to_owned());
        assert_eq!(env.lookup("TEST_PORT").as_deref(), Some("9009"));
        assert_eq!(env.lookup("TEST_HOST"), None);

        let env: BTreeMap<_, _> = env.into_iter().collect();
        assert_eq!((&env).lookup("TEST_PORT").as_deref(), Some("9009"));
    }

    #[test]
    fn process_env_reads_variables() {
        std::env::set_var("INFILL_LOOKUP_TEST_KEY", "present");
        assert_eq!(ProcessEnv.lookup("INFILL_LOOKUP_TEST_KEY").as_deref(), Some("present"));
        assert_eq!(ProcessEnv.lookup("INFILL_LOOKUP_TEST_KEY_UNSET"), None);
    }
}
