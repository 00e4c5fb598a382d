use std::sync::Arc;

use tracing::{debug, info};

use crate::config::*;
use crate::core::errors::{AccountError, AccountResult, Field, Rule, ValidationErrors};
use crate::core::helpers::{hash_password, now, verify_password};
use crate::core::store::{next_id, KvStore};
use crate::models::{NewUserAccount, UserAccount};

/// Entry point for account, tweet and favorite operations over a store.
#[derive(Debug)]
pub struct Accounts<S: KvStore> {
    pub(crate) store: Arc<S>,
    pub(crate) config: AccountsConfig,
}

impl<S: KvStore> Clone for Accounts<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: KvStore> Accounts<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, AccountsConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: AccountsConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AccountsConfig {
        &self.config
    }

    /// Run every rule, name uniqueness included.
    pub fn validate(&self, attrs: &NewUserAccount) -> AccountResult<()> {
        let mut errors = match attrs.validate_attributes() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(name) = attrs.name.as_deref().filter(|n| !n.is_empty()) {
            if self.name_taken(name)? {
                errors.add(Field::Name, Rule::Taken);
            }
        }

        if !errors.is_empty() {
            debug!(name = ?attrs.name, %errors, "account attributes rejected");
        }
        Ok(errors.into_result()?)
    }

    /// `Ok(false)` on a validation failure; store failures still surface.
    pub fn is_valid(&self, attrs: &NewUserAccount) -> AccountResult<bool> {
        match self.validate(attrs) {
            Ok(()) => Ok(true),
            Err(AccountError::Validation(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn name_taken(&self, name: &str) -> AccountResult<bool> {
        Ok(self.store.exists(&user_name_key(name))?)
    }

    /// Validate and persist. Nothing is written when validation fails.
    pub fn create(&self, attrs: NewUserAccount) -> AccountResult<UserAccount> {
        self.validate(&attrs)?;

        // Presence was checked by validate.
        let name = attrs.name.unwrap_or_default();
        let password_hash = hash_password(attrs.password.as_deref().unwrap_or_default())?;

        // The name index is the uniqueness guard at write time.
        let name_key = user_name_key(&name);
        if self.store.exists(&name_key)? {
            let mut errors = ValidationErrors::new();
            errors.add(Field::Name, Rule::Taken);
            return Err(errors.into());
        }

        let id = next_id(self.store(), USERS_SEQ)?;
        let user = UserAccount {
            id,
            name,
            password_hash,
            email: attrs.email,
            phone: attrs.phone,
            profile_image: None,
            created_at: now(),
        };

        self.store.set_json(&name_key, &id)?;
        self.store.set_json(&user_key(id), &user)?;

        let mut users: Vec<u64> = self.store.get_json(USERS_LIST_KEY)?.unwrap_or_default();
        users.push(id);
        self.store.set_json(USERS_LIST_KEY, &users)?;

        info!(user_id = id, name = %user.name, "account created");
        Ok(user.public())
    }

    pub fn find(&self, id: u64) -> AccountResult<Option<UserAccount>> {
        Ok(self
            .store
            .get_json::<UserAccount>(&user_key(id))?
            .map(|u| u.public()))
    }

    pub fn find_by_name(&self, name: &str) -> AccountResult<Option<UserAccount>> {
        match self.store.get_json::<u64>(&user_name_key(name))? {
            Some(id) => self.find(id),
            None => Ok(None),
        }
    }

    /// All accounts in creation order.
    pub fn list(&self) -> AccountResult<Vec<UserAccount>> {
        let ids: Vec<u64> = self.store.get_json(USERS_LIST_KEY)?.unwrap_or_default();
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.find(id)? {
                users.push(user);
            }
        }
        Ok(users)
    }

    pub fn authenticate(&self, name: &str, password: &str) -> AccountResult<Option<UserAccount>> {
        let id = match self.store.get_json::<u64>(&user_name_key(name))? {
            Some(id) => id,
            None => return Ok(None),
        };
        let user = match self.store.get_json::<UserAccount>(&user_key(id))? {
            Some(u) => u,
            None => return Ok(None),
        };

        if verify_password(password, &user.password_hash) {
            Ok(Some(user.public()))
        } else {
            debug!(user_id = id, "password mismatch");
            Ok(None)
        }
    }

    /// Load an account with its hash, or fail with `NotFound`.
    pub(crate) fn require_user(&self, id: u64) -> AccountResult<UserAccount> {
        self.store
            .get_json::<UserAccount>(&user_key(id))?
            .ok_or_else(|| AccountError::NotFound(format!("User {} not found", id)))
    }
}
