use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::clients::auth_client::AuthProvider;
use crate::form::FormStore;

use super::{Navigator, PageToken, SIGN_IN_ROUTE};

/// On page activation, attaches the signed-in user to the draft or sends
/// the visitor to the sign-in route. While the page stays active it also
/// reacts to later session changes; once the page token is deactivated,
/// pending notifications are dropped without touching the store.
pub struct AuthGate {
    auth: Arc<dyn AuthProvider>,
    store: Arc<FormStore>,
    navigator: Arc<dyn Navigator>,
    token: PageToken,
}

impl AuthGate {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<FormStore>,
        navigator: Arc<dyn Navigator>,
        token: PageToken,
    ) -> AuthGate {
        AuthGate {
            auth,
            store,
            navigator,
            token,
        }
    }

    pub async fn activate(&self) -> Result<()> {
        match self.auth.current_session().await? {
            Some(session) => {
                info!("session found, owner {}", session.user_id);
                self.store.set_owner(&session.user_id);
            }
            None => {
                // Not signed in: redirect and leave the draft untouched.
                self.navigator.navigate(SIGN_IN_ROUTE);
                return Ok(());
            }
        }

        let receiver = self.auth.subscribe();
        let store = self.store.clone();
        let navigator = self.navigator.clone();
        let token = self.token.clone();

        tokio::task::spawn(async move {
            while let Ok(session) = receiver.recv().await {
                if !token.is_active() {
                    break;
                }
                match session {
                    Some(session) => store.set_owner(&session.user_id),
                    None => navigator.navigate(SIGN_IN_ROUTE),
                }
            }
        });

        Ok(())
    }
}
