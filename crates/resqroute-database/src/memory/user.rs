//! In-memory user store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use resqroute_core::AppError;
use resqroute_core::result::AppResult;
use resqroute_entity::user::{CreateUser, UpdateProfile, User, UserRole};

use super::newest_first;
use crate::store::{EMAIL_TAKEN, RoleCounts, UserStore};

/// [`UserStore`] held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<Uuid, User>>,
    /// Lowercased email to user ID, the uniqueness index.
    emails: Arc<DashMap<String, Uuid>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        newest_first(&mut users, |u| (u.created_at, u.id));
        users
    }
}

fn has_push_token(user: &User) -> bool {
    user.push_token().is_some()
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(&email.to_lowercase()).map(|e| *e.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.value().clone()))
            .collect())
    }

    async fn list(&self, limit: Option<usize>) -> AppResult<Vec<User>> {
        let mut users = self.sorted(|_| true);
        if let Some(limit) = limit {
            users.truncate(limit);
        }
        Ok(users)
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let email = data.email.to_lowercase();
        let id = Uuid::now_v7();
        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => return Err(AppError::conflict(EMAIL_TAKEN)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now();
        let user = User {
            id,
            name: data.name.clone(),
            email,
            password_hash: data.password_hash.clone(),
            role: data.role,
            fcm_token: None,
            fcm_tokens: Vec::new(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, data: &UpdateProfile) -> AppResult<Option<User>> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = &data.email {
            let email = email.to_lowercase();
            if email != user.email {
                match self.emails.entry(email.clone()) {
                    Entry::Occupied(_) => return Err(AppError::conflict(EMAIL_TAKEN)),
                    Entry::Vacant(slot) => {
                        slot.insert(id);
                    }
                }
                self.emails.remove(&user.email);
                user.email = email;
            }
        }
        if let Some(name) = &data.name {
            user.name = name.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>> {
        Ok(self.users.get_mut(&id).map(|mut user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.emails.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn register_push_token(&self, id: Uuid, token: &str) -> AppResult<Option<User>> {
        Ok(self.users.get_mut(&id).map(|mut user| {
            user.fcm_token = Some(token.to_string());
            if !user.fcm_tokens.iter().any(|t| t == token) {
                user.fcm_tokens.push(token.to_string());
            }
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn find_push_recipients(
        &self,
        role: Option<UserRole>,
        limit: Option<usize>,
    ) -> AppResult<Vec<User>> {
        let mut users =
            self.sorted(|u| role.is_none_or(|r| u.role == r) && has_push_token(u));
        if let Some(limit) = limit {
            users.truncate(limit);
        }
        Ok(users)
    }

    async fn count_by_role(&self) -> AppResult<RoleCounts> {
        let mut counts = RoleCounts::default();
        for entry in self.users.iter() {
            counts.total += 1;
            match entry.value().role {
                UserRole::Admin => counts.admins += 1,
                UserRole::Driver => counts.drivers += 1,
                UserRole::User => counts.users += 1,
            }
        }
        Ok(counts)
    }

    async fn count_logged_in_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        Ok(self
            .users
            .iter()
            .filter(|e| e.value().last_login_at.is_some_and(|at| at >= since))
            .count() as i64)
    }
}
