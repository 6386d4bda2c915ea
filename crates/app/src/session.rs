//! Session manager
//!
//! Holds the signed-in identity for one front end and mirrors it to durable storage under
//! `currentUser` (and `currentCustomer` for the storefront) so a restarted shell picks up where
//! it left off.

use std::{fmt, sync::Arc};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{
        ApiError, BookshopApi,
        models::{Credentials, CustomerProfile, UserProfile},
    },
    config::Frontend,
    store::{SessionStore, StoreError},
};

/// Storage key of the signed-in user.
pub const CURRENT_USER: &str = "currentUser";

/// Storage key of the storefront customer profile.
pub const CURRENT_CUSTOMER: &str = "currentCustomer";

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user.
    pub user: UserProfile,

    /// Linked customer profile. Always present for the storefront, never for the console.
    pub customer: Option<CustomerProfile>,
}

/// Errors raised by the session manager.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server rejected the credentials.
    #[error("invalid username or password")]
    InvalidCredentials(#[source] ApiError),

    /// The server could not be reached or answered unexpectedly.
    #[error(transparent)]
    Api(ApiError),

    /// Nobody is signed in.
    #[error("please sign in first")]
    NotAuthenticated,

    /// The session could not be written to storage.
    #[error("failed to persist session")]
    Store(#[from] StoreError),

    /// The session could not be encoded for storage.
    #[error("failed to encode session")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
enum RestoreError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored {key:?} is not valid JSON")]
    Corrupt {
        key: &'static str,

        #[source]
        source: serde_json::Error,
    },
}

/// Session manager for one front end.
pub struct SessionManager {
    frontend: Frontend,
    api: Arc<dyn BookshopApi>,
    store: Box<dyn SessionStore>,
    current: Option<Session>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("frontend", &self.frontend)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager with no session loaded.
    pub fn new(frontend: Frontend, api: Arc<dyn BookshopApi>, store: Box<dyn SessionStore>) -> Self {
        Self {
            frontend,
            api,
            store,
            current: None,
        }
    }

    /// The current session, if signed in.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// The current session or [`SessionError::NotAuthenticated`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] when nobody is signed in.
    pub fn require(&self) -> Result<&Session, SessionError> {
        self.current.as_ref().ok_or(SessionError::NotAuthenticated)
    }

    /// The session customer, if any.
    pub fn customer(&self) -> Option<&CustomerProfile> {
        self.current.as_ref()?.customer.as_ref()
    }

    /// Load a previously persisted session.
    ///
    /// Unreadable or malformed stored data is discarded: both keys are cleared and `None` is
    /// returned.
    pub fn restore(&mut self) -> Option<&Session> {
        match self.read_stored() {
            Ok(session) => self.current = session,
            Err(error) => {
                warn!(%error, "discarding stored session");

                self.current = None;
                self.clear_storage();
            }
        }

        self.current.as_ref()
    }

    /// Sign in against the front end's login endpoint and persist the session.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidCredentials`] when the server rejects the login.
    /// - [`SessionError::Api`] when the server cannot be reached.
    /// - [`SessionError::Store`] when the session cannot be persisted.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&Session, SessionError> {
        let session = match self.frontend {
            Frontend::Storefront => {
                let login = self
                    .api
                    .customer_login(credentials)
                    .await
                    .map_err(login_error)?;

                Session {
                    user: login.user,
                    customer: Some(login.customer),
                }
            }
            Frontend::Console => Session {
                user: self
                    .api
                    .staff_login(credentials)
                    .await
                    .map_err(login_error)?,
                customer: None,
            },
        };

        self.persist(&session)?;

        info!(user = %session.user.username, frontend = ?self.frontend, "signed in");

        Ok(&*self.current.insert(session))
    }

    /// Sign out. The server is told on a best-effort basis; local state is always cleared.
    pub async fn logout(&mut self) {
        if let Err(error) = self.api.logout().await {
            warn!(%error, "logout request failed");
        }

        if let Some(session) = self.current.take() {
            info!(user = %session.user.username, "signed out");
        }

        self.clear_storage();
    }

    /// Replace the session customer and persist it.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotAuthenticated`] when nobody is signed in.
    /// - [`SessionError::Store`] or [`SessionError::Encode`] when it cannot be persisted.
    pub fn update_customer(&mut self, customer: CustomerProfile) -> Result<(), SessionError> {
        let session = self.current.as_mut().ok_or(SessionError::NotAuthenticated)?;

        self.store
            .set(CURRENT_CUSTOMER, &serde_json::to_string(&customer)?)?;

        session.customer = Some(customer);

        Ok(())
    }

    fn keys(&self) -> &'static [&'static str] {
        match self.frontend {
            Frontend::Storefront => &[CURRENT_USER, CURRENT_CUSTOMER],
            Frontend::Console => &[CURRENT_USER],
        }
    }

    fn read_stored(&self) -> Result<Option<Session>, RestoreError> {
        let Some(user) = self.read_key::<UserProfile>(CURRENT_USER)? else {
            return Ok(None);
        };

        match self.frontend {
            Frontend::Console => Ok(Some(Session {
                user,
                customer: None,
            })),
            Frontend::Storefront => Ok(self
                .read_key::<CustomerProfile>(CURRENT_CUSTOMER)?
                .map(|customer| Session {
                    user,
                    customer: Some(customer),
                })),
        }
    }

    fn read_key<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, RestoreError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| RestoreError::Corrupt { key, source })
    }

    fn persist(&mut self, session: &Session) -> Result<(), SessionError> {
        self.store
            .set(CURRENT_USER, &serde_json::to_string(&session.user)?)?;

        if let Some(customer) = &session.customer {
            self.store
                .set(CURRENT_CUSTOMER, &serde_json::to_string(customer)?)?;
        }

        Ok(())
    }

    fn clear_storage(&mut self) {
        for key in self.keys() {
            if let Err(error) = self.store.remove(key) {
                warn!(%error, key, "failed to clear stored session");
            }
        }
    }
}

fn login_error(error: ApiError) -> SessionError {
    if error.is_rejection() {
        SessionError::InvalidCredentials(error)
    } else {
        SessionError::Api(error)
    }
}
