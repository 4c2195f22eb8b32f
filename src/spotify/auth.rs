use reqwest::{Client, StatusCode, Url};
use tokio::sync::mpsc;

use crate::{
    Error, Res,
    api::CallbackState,
    config::Config,
    info,
    management::CredentialStore,
    server::CallbackServer,
    spotify::read_json,
    success,
    types::{Credential, TokenErrorResponse, TokenResponse},
    utils, warning,
};

/// Why the user is asked to authorize again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    /// No token has been stored yet.
    Initial,
    /// The stored token was rejected by the API.
    Expired,
}

impl LoginReason {
    pub fn explanation(&self) -> &'static str {
        match self {
            LoginReason::Initial => {
                "Please allow access to your Spotify account in your browser before continuing."
            }
            LoginReason::Expired => "Login expired. Please log in to Spotify again.",
        }
    }
}

/// Drives the interactive authorization code flow.
///
/// The flow can run several times within one process: each run binds its own
/// callback server and shuts it down once a code has been exchanged.
pub struct AuthFlow {
    config: Config,
    store: CredentialStore,
    exchange: TokenExchange,
}

impl AuthFlow {
    /// Fails with [`Error::Config`] when no application identity is configured.
    pub fn new(config: Config, store: CredentialStore) -> Res<Self> {
        config.validate()?;
        let exchange = TokenExchange::from_config(&config);
        Ok(Self {
            config,
            store,
            exchange,
        })
    }

    /// Authorization page the user is sent to.
    pub fn authorize_url(&self, state: &str) -> Res<String> {
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("scope", self.config.scope.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid SPOTIFY_AUTH_URL: {}", e)))?;
        Ok(url.to_string())
    }

    /// Sends the user through authorization and stores the resulting token.
    ///
    /// Suspends until the callback server delivers the outcome of the code
    /// exchange. An `invalid_client` answer is reported as [`Error::Config`]
    /// and the developer dashboard is opened; nothing is retried.
    pub async fn obtain_credential(&self, reason: LoginReason) -> Res<Credential> {
        self.config.validate()?;
        info!("{}", reason.explanation());

        let state = utils::generate_state();
        let (sender, mut receiver) = mpsc::channel(1);
        let callback_state = CallbackState::new(state.clone(), self.exchange.clone(), sender);
        let server = CallbackServer::start(&self.config.server_addr, callback_state).await?;

        let auth_url = self.authorize_url(&state)?;
        if webbrowser::open(&auth_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            )
        }

        let outcome = receiver.recv().await.unwrap_or_else(|| {
            Err(Error::Authorization(
                "callback server stopped before a code arrived".to_string(),
            ))
        });
        server.shutdown().await;

        let credential = match outcome {
            Ok(credential) => credential,
            Err(e) => {
                if e.is_config() && webbrowser::open(&self.config.dashboard_url()).is_err() {
                    warning!("Open {} to check your application", self.config.dashboard_url());
                }
                return Err(e);
            }
        };

        self.store.save(&credential).await?;
        success!("Access granted.");
        Ok(credential)
    }
}

/// Exchanges an authorization code for a bearer token.
#[derive(Clone)]
pub struct TokenExchange {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl TokenExchange {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: Client::new(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// Posts the code to the token endpoint with HTTP Basic client authentication.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when the provider answers `invalid_client`
    /// - [`Error::Authorization`] for any other rejection
    /// - [`Error::Request`] when the endpoint cannot be reached
    pub async fn exchange(&self, code: &str) -> Res<Credential> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%status, "token exchange response");

        if status == StatusCode::OK {
            let token = read_json::<TokenResponse>(response).await?;
            return Ok(Credential::new(token.access_token));
        }

        let body = response.text().await.unwrap_or_default();
        let rejection = serde_json::from_str::<TokenErrorResponse>(&body).unwrap_or_default();

        if rejection.error == "invalid_client" {
            return Err(Error::Config(
                "Invalid client secret. Paste the Client Secret from the Spotify developer dashboard into SPOTIFY_CLIENT_SECRET, then run sortify again.".to_string(),
            ));
        }

        let reason = match (rejection.error.as_str(), rejection.error_description) {
            ("", _) => body,
            (error, Some(description)) => format!("{}: {}", error, description),
            (error, None) => error.to_string(),
        };
        Err(Error::Authorization(format!(
            "status {}: {}",
            status.as_u16(),
            reason
        )))
    }
}
