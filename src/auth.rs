use std::path::Path;

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Signed-in state, persisted between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: SessionUser,
}

impl Session {
    pub fn load(path: &Path) -> anyhow::Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.display()))?;
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("corrupt session file {}", path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("failed to write session file {}", path.display()))?;
        debug!("session saved to {}", path.display());
        Ok(())
    }

    /// Returns whether a session file was removed.
    pub fn clear(path: &Path) -> anyhow::Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)
            .with_context(|| format!("failed to remove session file {}", path.display()))?;
        Ok(true)
    }

    pub fn email(&self) -> &str {
        self.user.email.as_deref().unwrap_or(&self.user.id)
    }
}

/// Outcome of a sign-up. Projects requiring e-mail confirmation return no
/// session until the address is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUp {
    pub user: SessionUser,
    pub session: Option<Session>,
}

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<SessionUser>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl Store {
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self
            .request(reqwest::Method::POST, url)
            .json(&json!({ "email": email, "password": password }));
        self.send("sign in", request)?
            .json()
            .map_err(|source| StoreError::Http {
                what: "sign in".to_string(),
                source,
            })
    }

    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<SignUp, StoreError> {
        let url = self.endpoint("auth/v1/signup")?;
        let request = self.request(reqwest::Method::POST, url).json(&json!({
            "email": email,
            "password": password,
            "data": { "full_name": name },
        }));
        let response: SignUpResponse =
            self.send("sign up", request)?
                .json()
                .map_err(|source| StoreError::Http {
                    what: "sign up".to_string(),
                    source,
                })?;

        let user = match (response.user, response.id) {
            (Some(user), _) => user,
            (None, Some(id)) => SessionUser {
                id,
                email: response.email,
            },
            (None, None) => return Err(StoreError::Empty("sign up")),
        };
        let session = response.access_token.map(|access_token| Session {
            access_token,
            refresh_token: response.refresh_token,
            user: user.clone(),
        });
        Ok(SignUp { user, session })
    }

    pub fn sign_out(&self) -> Result<(), StoreError> {
        let url = self.endpoint("auth/v1/logout")?;
        self.send("sign out", self.request(reqwest::Method::POST, url))?;
        Ok(())
    }
}
