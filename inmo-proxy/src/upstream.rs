use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use inmo_agenda::{Contact, Event, Property, Snapshot};

/// The backend serves lists either bare or DRF-paginated; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Plain(items) => items,
            ListBody::Paginated { results } => results,
        }
    }
}

pub struct Upstream {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl Upstream {
    pub fn new(base: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Option<Vec<T>> {
        let url = format!("{}{path}", self.base);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("GET {url} failed: {err}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("GET {url} answered {}", response.status());
            return None;
        }

        match response.json::<ListBody<T>>().await {
            Ok(body) => Some(body.into_vec()),
            Err(err) => {
                warn!("GET {url} returned an undecodable body: {err}");
                None
            }
        }
    }

    /// Fetch the three backend lists concurrently, the way the dashboard
    /// loads them. `None` if any of the three fails.
    pub async fn fetch_snapshot(&self) -> Option<Snapshot> {
        debug!("fetching snapshot from {}", self.base);

        let (events, contacts, properties) = tokio::join!(
            self.fetch_list::<Event>("/api/eventos/"),
            self.fetch_list::<Contact>("/api/contactos/"),
            self.fetch_list::<Property>("/api/propiedades/"),
        );

        Some(Snapshot {
            events: events?,
            contacts: contacts?,
            properties: properties?,
        })
    }
}
