//! In-memory content platform for tests.
//!
//! Behaves like a single space: environments clone the entries of their
//! source, updates bump `sys.version`, and every call is appended to a log so
//! tests can assert on ordering. Failures can be injected per API key, per
//! migration file, and for alias updates. The platform also acts as its own
//! migration executor.

use crate::error::{PlatformError, PlatformResult};
use crate::traits::{ContentPlatform, MigrationExecutor, MigrationRequest};
use crate::types::{
    ApiKey, Entry, Environment, EnvironmentAlias, Link, LinkSys, Locale, ResourceSys,
};
use async_trait::async_trait;
use cfm_core::EnvironmentId;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct State {
    environments: BTreeMap<String, Environment>,
    status_script: HashMap<String, VecDeque<String>>,
    api_keys: Vec<ApiKey>,
    locales: Vec<Locale>,
    entries: HashMap<String, Vec<(String, Entry)>>,
    aliases: BTreeMap<String, EnvironmentAlias>,
    failing_keys: HashSet<String>,
    failing_migrations: HashSet<String>,
    fail_alias: bool,
    calls: Vec<String>,
}

/// A fake space held entirely in memory.
pub struct InMemoryPlatform {
    space_id: String,
    state: Mutex<State>,
}

fn status_link(status: &str) -> Link {
    Link {
        sys: LinkSys {
            kind: "Link".to_string(),
            link_type: "Status".to_string(),
            id: status.to_string(),
        },
    }
}

fn environment(id: &str, status: &str) -> Environment {
    let mut sys = ResourceSys::new(id, 1);
    sys.status = Some(status_link(status));
    Environment {
        sys,
        name: id.to_string(),
    }
}

fn not_found(resource: String) -> PlatformError {
    PlatformError::NotFound { resource }
}

impl InMemoryPlatform {
    /// An empty space.
    pub fn new(space_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Add an environment with the given status.
    pub fn with_environment(self, id: &str, status: &str) -> Self {
        self.state()
            .environments
            .insert(id.to_string(), environment(id, status));
        self
    }

    /// Statuses reported by successive lookups of `id`; the last one sticks.
    pub fn with_status_sequence(self, id: &str, statuses: &[&str]) -> Self {
        self.state().status_script.insert(
            id.to_string(),
            statuses.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Add an API key with access to the given environments.
    pub fn with_api_key(self, id: &str, environments: &[&str]) -> Self {
        let key = ApiKey {
            sys: ResourceSys::new(id, 1),
            name: format!("{} key", id),
            description: None,
            environments: environments
                .iter()
                .map(|env| Link::environment(&env_id(env)))
                .collect(),
        };
        self.state().api_keys.push(key);
        self
    }

    /// Add a locale shared by every environment.
    pub fn with_locale(self, code: &str, default: bool) -> Self {
        self.state().locales.push(Locale {
            code: code.to_string(),
            default,
        });
        self
    }

    /// Add an entry holding a single localized string field.
    pub fn with_entry(
        self,
        env: &str,
        content_type: &str,
        entry_id: &str,
        field: &str,
        locale: &str,
        value: &str,
    ) -> Self {
        let mut entry = Entry {
            sys: ResourceSys::new(entry_id, 1),
            fields: Default::default(),
        };
        entry.set_localized(field, locale, value);
        self.state()
            .entries
            .entry(env.to_string())
            .or_default()
            .push((content_type.to_string(), entry));
        self
    }

    /// Add an alias pointing at an environment.
    pub fn with_alias(self, alias_id: &str, env: &str) -> Self {
        let alias = EnvironmentAlias {
            sys: ResourceSys::new(alias_id, 1),
            environment: Link::environment(&env_id(env)),
        };
        self.state().aliases.insert(alias_id.to_string(), alias);
        self
    }

    /// Make updates of this API key fail.
    pub fn fail_api_key(self, id: &str) -> Self {
        self.state().failing_keys.insert(id.to_string());
        self
    }

    /// Make the migration with this file name fail.
    pub fn fail_migration(self, file_name: &str) -> Self {
        self.state().failing_migrations.insert(file_name.to_string());
        self
    }

    /// Make alias updates fail.
    pub fn fail_alias_update(self) -> Self {
        self.state().fail_alias = true;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Calls whose operation name matches `op`.
    pub fn calls_of(&self, op: &str) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.split(' ').next() == Some(op))
            .cloned()
            .collect()
    }

    /// Current state of an environment.
    pub fn environment(&self, id: &str) -> Option<Environment> {
        self.state().environments.get(id).cloned()
    }

    /// Current state of an API key.
    pub fn api_key(&self, id: &str) -> Option<ApiKey> {
        self.state().api_keys.iter().find(|k| k.sys.id == id).cloned()
    }

    /// Current state of an entry.
    pub fn entry(&self, env: &str, entry_id: &str) -> Option<Entry> {
        self.state()
            .entries
            .get(env)?
            .iter()
            .find(|(_, e)| e.sys.id == entry_id)
            .map(|(_, e)| e.clone())
    }

    /// Current state of an alias.
    pub fn alias(&self, alias_id: &str) -> Option<EnvironmentAlias> {
        self.state().aliases.get(alias_id).cloned()
    }

    fn record(state: &mut State, call: String) {
        log::debug!("memory platform: {}", call);
        state.calls.push(call);
    }
}

fn env_id(id: &str) -> EnvironmentId {
    EnvironmentId::try_new(id).unwrap_or_else(|| panic!("empty environment id in test fixture"))
}

fn bump(sys: &mut ResourceSys) {
    sys.version = Some(sys.version.unwrap_or(0) + 1);
}

#[async_trait]
impl ContentPlatform for InMemoryPlatform {
    fn space_id(&self) -> &str {
        &self.space_id
    }

    async fn get_environment(&self, id: &EnvironmentId) -> PlatformResult<Environment> {
        let mut state = self.state();
        Self::record(&mut state, format!("get_environment {}", id));

        if !state.environments.contains_key(id.as_str()) {
            return Err(not_found(format!("environments/{}", id)));
        }
        let next_status = match state.status_script.get_mut(id.as_str()) {
            Some(script) if script.len() > 1 => script.pop_front(),
            Some(script) => script.front().cloned(),
            None => None,
        };
        let env = state
            .environments
            .get_mut(id.as_str())
            .ok_or_else(|| not_found(format!("environments/{}", id)))?;
        if let Some(status) = next_status {
            env.sys.status = Some(status_link(&status));
        }
        Ok(env.clone())
    }

    async fn delete_environment(&self, id: &EnvironmentId) -> PlatformResult<()> {
        let mut state = self.state();
        Self::record(&mut state, format!("delete_environment {}", id));
        state
            .environments
            .remove(id.as_str())
            .ok_or_else(|| not_found(format!("environments/{}", id)))?;
        state.entries.remove(id.as_str());
        Ok(())
    }

    async fn create_environment(
        &self,
        id: &EnvironmentId,
        source: &EnvironmentId,
    ) -> PlatformResult<Environment> {
        let mut state = self.state();
        Self::record(&mut state, format!("create_environment {} from {}", id, source));
        if !state.environments.contains_key(source.as_str()) {
            return Err(not_found(format!("environments/{}", source)));
        }
        if state.environments.contains_key(id.as_str()) {
            return Err(PlatformError::Http {
                resource: format!("environments/{}", id),
                status: 409,
                message: "environment already exists".to_string(),
            });
        }
        let cloned = state.entries.get(source.as_str()).cloned().unwrap_or_default();
        state.entries.insert(id.to_string(), cloned);
        let env = environment(id.as_str(), "queued");
        state.environments.insert(id.to_string(), env.clone());
        Ok(env)
    }

    async fn list_api_keys(&self) -> PlatformResult<Vec<ApiKey>> {
        let mut state = self.state();
        Self::record(&mut state, "list_api_keys".to_string());
        Ok(state.api_keys.clone())
    }

    async fn update_api_key(&self, key: &ApiKey) -> PlatformResult<ApiKey> {
        let mut state = self.state();
        Self::record(&mut state, format!("update_api_key {}", key.sys.id));
        if state.failing_keys.contains(&key.sys.id) {
            return Err(PlatformError::Http {
                resource: format!("api_keys/{}", key.sys.id),
                status: 429,
                message: "rate limit exceeded".to_string(),
            });
        }
        let stored = state
            .api_keys
            .iter_mut()
            .find(|k| k.sys.id == key.sys.id)
            .ok_or_else(|| not_found(format!("api_keys/{}", key.sys.id)))?;
        let mut updated = key.clone();
        updated.sys = stored.sys.clone();
        bump(&mut updated.sys);
        *stored = updated.clone();
        Ok(updated)
    }

    async fn list_locales(&self, env: &EnvironmentId) -> PlatformResult<Vec<Locale>> {
        let mut state = self.state();
        Self::record(&mut state, format!("list_locales {}", env));
        if !state.environments.contains_key(env.as_str()) {
            return Err(not_found(format!("environments/{}", env)));
        }
        Ok(state.locales.clone())
    }

    async fn list_entries(
        &self,
        env: &EnvironmentId,
        content_type: &str,
    ) -> PlatformResult<Vec<Entry>> {
        let mut state = self.state();
        Self::record(&mut state, format!("list_entries {} {}", env, content_type));
        Ok(state
            .entries
            .get(env.as_str())
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(ct, _)| ct == content_type)
                    .map(|(_, e)| e.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_entry(&self, env: &EnvironmentId, entry: &Entry) -> PlatformResult<Entry> {
        let mut state = self.state();
        Self::record(&mut state, format!("update_entry {} {}", env, entry.sys.id));
        let stored = state
            .entries
            .get_mut(env.as_str())
            .and_then(|entries| entries.iter_mut().find(|(_, e)| e.sys.id == entry.sys.id))
            .ok_or_else(|| not_found(format!("environments/{}/entries/{}", env, entry.sys.id)))?;
        if stored.1.sys.version != entry.sys.version {
            return Err(PlatformError::Http {
                resource: format!("environments/{}/entries/{}", env, entry.sys.id),
                status: 409,
                message: "version mismatch".to_string(),
            });
        }
        stored.1.fields = entry.fields.clone();
        bump(&mut stored.1.sys);
        Ok(stored.1.clone())
    }

    async fn publish_entry(&self, env: &EnvironmentId, entry: &Entry) -> PlatformResult<Entry> {
        let mut state = self.state();
        Self::record(&mut state, format!("publish_entry {} {}", env, entry.sys.id));
        let stored = state
            .entries
            .get_mut(env.as_str())
            .and_then(|entries| entries.iter_mut().find(|(_, e)| e.sys.id == entry.sys.id))
            .ok_or_else(|| not_found(format!("environments/{}/entries/{}", env, entry.sys.id)))?;
        stored.1.sys.published_version = stored.1.sys.version;
        bump(&mut stored.1.sys);
        Ok(stored.1.clone())
    }

    async fn get_alias(&self, alias_id: &str) -> PlatformResult<EnvironmentAlias> {
        let mut state = self.state();
        Self::record(&mut state, format!("get_alias {}", alias_id));
        state
            .aliases
            .get(alias_id)
            .cloned()
            .ok_or_else(|| not_found(format!("environment_aliases/{}", alias_id)))
    }

    async fn update_alias(&self, alias: &EnvironmentAlias) -> PlatformResult<EnvironmentAlias> {
        let mut state = self.state();
        Self::record(
            &mut state,
            format!("update_alias {} -> {}", alias.sys.id, alias.environment.id()),
        );
        if state.fail_alias {
            return Err(PlatformError::Http {
                resource: format!("environment_aliases/{}", alias.sys.id),
                status: 422,
                message: "alias target is not ready".to_string(),
            });
        }
        let stored = state
            .aliases
            .get_mut(&alias.sys.id)
            .ok_or_else(|| not_found(format!("environment_aliases/{}", alias.sys.id)))?;
        stored.environment = alias.environment.clone();
        bump(&mut stored.sys);
        Ok(stored.clone())
    }
}

#[async_trait]
impl MigrationExecutor for InMemoryPlatform {
    async fn run_migration(&self, request: &MigrationRequest) -> PlatformResult<()> {
        let file = request
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut state = self.state();
        Self::record(
            &mut state,
            format!("run_migration {} {}", request.environment_id, file),
        );
        if state.failing_migrations.contains(&file) {
            return Err(PlatformError::MigrationFailed {
                file,
                exit_code: 1,
                stderr: "The following migration has been planned but failed".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
