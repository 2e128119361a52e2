//! Process-wide network bundle.

use std::sync::{Arc, OnceLock};

use rocket_domain::LaunchId;
use tokio::sync::mpsc;

use crate::booking::{BookingController, BookingEvent};
use crate::details::LaunchDetailsLoader;
use crate::interceptor::{InterceptorChainFactory, InterceptorProvider};
use crate::login::LoginService;
use crate::pager::LaunchListPager;
use crate::ports::{CredentialStore, Transport};
use crate::session::SessionClient;

static SHARED: OnceLock<Network> = OnceLock::new();

/// The session client together with the credential store it reads.
///
/// Components take their dependencies from a `Network` explicitly. One
/// instance may additionally be installed as the process default for call
/// sites that have no other way to reach it.
#[derive(Clone)]
pub struct Network {
    client: Arc<SessionClient>,
    credentials: Arc<dyn CredentialStore>,
}

impl Network {
    /// Builds a network whose chain is the token injector followed by `base`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        base: Arc<dyn InterceptorProvider>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let chain = InterceptorChainFactory::new(Arc::clone(&credentials), base);
        Self {
            client: Arc::new(SessionClient::new(transport, Arc::new(chain))),
            credentials,
        }
    }

    /// Installs `network` as the process default.
    ///
    /// # Errors
    /// Returns the rejected network if a default is already installed.
    pub fn install(network: Self) -> Result<&'static Self, Self> {
        let installed = SHARED.get_or_init(|| network.clone());
        if !Arc::ptr_eq(&installed.client, &network.client) {
            return Err(network);
        }
        tracing::debug!("process-wide network installed");
        Ok(installed)
    }

    /// The process default, if one was installed.
    #[must_use]
    pub fn shared() -> Option<&'static Self> {
        SHARED.get()
    }

    /// The session client.
    #[must_use]
    pub fn client(&self) -> Arc<SessionClient> {
        Arc::clone(&self.client)
    }

    /// The credential store.
    #[must_use]
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials)
    }

    /// A fresh pager for one listing session.
    #[must_use]
    pub fn launch_pager(&self) -> LaunchListPager {
        LaunchListPager::new(self.client())
    }

    /// A detail loader bound to `launch_id`.
    #[must_use]
    pub fn launch_details(&self, launch_id: LaunchId) -> LaunchDetailsLoader {
        LaunchDetailsLoader::new(self.client(), launch_id)
    }

    /// A booking controller reporting through `events`.
    #[must_use]
    pub fn booking(&self, events: mpsc::UnboundedSender<BookingEvent>) -> BookingController {
        BookingController::new(self.client(), self.credentials(), events)
    }

    /// A login service storing tokens in this network's credential store.
    #[must_use]
    pub fn login(&self) -> LoginService {
        LoginService::new(self.client(), self.credentials())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use crate::interceptor::Interceptor;
    use crate::pager::RequestMore;
    use crate::test_support::{ScriptedTransport, recv};
    use rocket_domain::{SESSION_KEY, Token};
    use serde_json::json;

    fn network(transport: &Arc<ScriptedTransport>, store: &Arc<MemoryCredentialStore>) -> Network {
        let base: Vec<Arc<dyn Interceptor>> = Vec::new();
        Network::new(
            Arc::clone(transport) as Arc<dyn Transport>,
            Arc::new(base),
            Arc::clone(store) as Arc<dyn CredentialStore>,
        )
    }

    #[tokio::test]
    async fn test_components_share_credentials() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_data(json!({
            "launches": { "cursor": null, "hasMore": false, "launches": [] }
        }));
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(SESSION_KEY, Token::new("shared-token")).unwrap();
        let network = network(&transport, &store);

        assert!(network.login().is_logged_in());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pager = network.launch_pager();
        assert!(matches!(
            pager.request_more(move |c| {
                let _ = tx.send(c);
            }),
            RequestMore::Issued(_)
        ));
        pager.apply(recv(&mut rx).await);

        assert_eq!(
            transport.sent()[0].header("Authorization"),
            Some("shared-token")
        );
    }

    #[test]
    fn test_install_once() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(MemoryCredentialStore::new());

        let first = Network::install(network(&transport, &store)).ok().expect("first install succeeds");
        let shared = Network::shared().expect("installed network is shared");
        assert!(std::ptr::eq(first, shared));

        let second = network(&transport, &store);
        let rejected = Network::install(second.clone()).err().expect("second install is rejected");
        assert!(Arc::ptr_eq(&rejected.client, &second.client));
        assert!(std::ptr::eq(Network::shared().unwrap(), first));
    }
}
