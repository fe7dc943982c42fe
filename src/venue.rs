use reqwest::{Client, StatusCode, Url};
use tracing::{debug, error, info};

pub use crate::Error;

const VENUES_PATH: &str = "/venues";

/// What the server did with a deletion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The response came from a different URL than the one requested.
    ///
    /// A redirect chain that ends on the requested URL again is reported as
    /// [`Completed`](Self::Completed).
    Redirected(Url),
    Completed(StatusCode),
}

impl DeleteOutcome {
    pub fn redirect_target(&self) -> Option<&Url> {
        match self {
            DeleteOutcome::Redirected(url) => Some(url),
            DeleteOutcome::Completed(_) => None,
        }
    }
}

/// Receives the page navigation that follows a redirected deletion.
pub trait Navigator {
    fn navigate(&self, url: &Url);
}

impl<F: Fn(&Url)> Navigator for F {
    fn navigate(&self, url: &Url) {
        self(url)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, url: &Url) {
        info!(%url, "navigating");
    }
}

/// HTTP access to the venue endpoints of a single origin.
#[derive(Debug, Clone)]
pub struct VenueClient {
    http: Client,
    base: Url,
}

impl VenueClient {
    pub fn new(base: Url) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves `/venues/{id}` against the base URL. The id is inserted as is.
    pub fn venue_url(&self, id: &str) -> Result<Url, Error> {
        Ok(self.base.join(&format!("{VENUES_PATH}/{id}"))?)
    }

    pub async fn delete_venue(&self, id: &str) -> Result<DeleteOutcome, Error> {
        let url = self.venue_url(id)?;

        debug!(%url, "sending DELETE request");
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .inspect_err(|err| error!(%err, "DELETE request failed"))?;

        if response.url() != &url {
            return Ok(DeleteOutcome::Redirected(response.url().clone()));
        }

        Ok(DeleteOutcome::Completed(response.status()))
    }
}

/// The "delete venue" button of a venue page.
///
/// Every [`click`](Self::click) sends its own request. Clicks are not
/// de-duplicated and may be in flight concurrently.
pub struct DeleteButton<N> {
    client: VenueClient,
    venue_id: String,
    navigator: N,
}

impl<N: Navigator> DeleteButton<N> {
    pub fn new<S: Into<String>>(client: VenueClient, venue_id: S, navigator: N) -> Self {
        Self {
            client,
            venue_id: venue_id.into(),
            navigator,
        }
    }

    pub fn venue_id(&self) -> &str {
        &self.venue_id
    }

    pub async fn click(&self) -> Result<DeleteOutcome, Error> {
        let venue_id = self.venue_id.as_str();
        debug!(venue_id, "delete button clicked");

        let outcome = self.client.delete_venue(venue_id).await?;

        if let Some(url) = outcome.redirect_target() {
            self.navigator.navigate(url);
        }

        Ok(outcome)
    }

    /// Like [`click`](Self::click), handing the result to `callback` instead
    /// of returning it.
    pub async fn click_with<F>(&self, callback: F)
    where
        F: FnOnce(Result<DeleteOutcome, Error>),
    {
        callback(self.click().await)
    }
}
