use crate::errors::{decode_error, from_reqwest, invalid_url, status_error};
use esnap_core::config::{Config, Timeouts};
use esnap_core::errors::Result;
use esnap_core::model::{Acknowledgement, CreateResponse, Snapshot, SnapshotList};
use esnap_core::SnapshotApi;
use esnap_core_types::schema::{
    OP_CREATE_SNAPSHOT, OP_DELETE_SNAPSHOT, OP_LIST_SNAPSHOTS, OP_SNAPSHOT_STATUS,
};
use esnap_core_types::Sensitive;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Basic-auth credentials taken out of the configured URL
#[derive(Clone)]
struct Credentials {
    username: String,
    password: Option<Sensitive<String>>,
}

/// Snapshot API client for one search cluster
#[derive(Clone)]
pub struct EsSnapshotClient {
    base_url: Url,
    credentials: Option<Credentials>,
    timeouts: Timeouts,
    http: Client,
}

impl std::fmt::Debug for EsSnapshotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EsSnapshotClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.credentials.is_some())
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl EsSnapshotClient {
    /// Create a client for `base_url`
    ///
    /// Credentials embedded in the URL are moved to a basic-auth header so
    /// they never appear in request URLs or error messages.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the URL cannot be parsed or cannot carry a path,
    /// `Transport` when the HTTP client cannot be built.
    pub fn new(base_url: &Sensitive<String>, timeouts: Timeouts) -> Result<Self> {
        let mut url = Url::parse(base_url.expose())
            .map_err(|e| invalid_url(format!("{} ({})", base_url.redacted(), e)))?;
        if url.cannot_be_a_base() {
            return Err(invalid_url(format!(
                "{} cannot be used as a base URL",
                base_url.redacted()
            )));
        }

        let credentials = if url.username().is_empty() {
            None
        } else {
            Some(Credentials {
                username: url.username().to_string(),
                password: url.password().map(|p| Sensitive::new(p.to_string())),
            })
        };
        url.set_username("")
            .and_then(|_| url.set_password(None))
            .map_err(|_| invalid_url("credentials could not be removed from URL"))?;

        let http = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| from_reqwest("build_client", e))?;

        tracing::debug!(
            endpoint = %base_url.redacted(),
            authenticated = credentials.is_some(),
            "snapshot client ready"
        );

        Ok(Self {
            base_url: url,
            credentials,
            timeouts,
            http,
        })
    }

    /// Create a client from a loaded configuration
    ///
    /// # Errors
    ///
    /// See [`EsSnapshotClient::new`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, config.timeouts)
    }

    /// `{base}/_snapshot/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| invalid_url("base URL cannot carry a path"))?
            .pop_if_empty()
            .push("_snapshot")
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(
                &creds.username,
                creds.password.as_ref().map(|p| p.expose().as_str()),
            ),
            None => request,
        }
    }

    fn send(&self, op: &str, request: RequestBuilder, timeout: Duration) -> Result<Response> {
        let response = self
            .authorize(request)
            .timeout(timeout)
            .send()
            .map_err(|e| from_reqwest(op, e))?;
        tracing::debug!(op = op, http_status = response.status().as_u16(), "response received");
        Ok(response)
    }

    /// Read a success body as JSON
    ///
    /// The response is consumed on every path, so its connection is
    /// released whether decoding succeeds or not.
    fn read_json<T: DeserializeOwned>(op: &str, response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().map_err(|e| from_reqwest(op, e))?;
        if !status.is_success() {
            return Err(status_error(op, status, &body));
        }
        serde_json::from_str(&body).map_err(|e| decode_error(op, e))
    }
}

impl SnapshotApi for EsSnapshotClient {
    #[tracing::instrument(level = "debug", skip(self))]
    fn list_snapshots(&self, repository: &str) -> Result<Vec<Snapshot>> {
        let url = self.endpoint(&[repository, "_all"])?;
        let response = self.send(
            OP_LIST_SNAPSHOTS,
            self.http.get(url),
            self.timeouts.list,
        )?;
        let list: SnapshotList = Self::read_json(OP_LIST_SNAPSHOTS, response)?;
        Ok(list.snapshots)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn delete_snapshot(&self, repository: &str, snapshot_id: &str) -> Result<Acknowledgement> {
        let url = self.endpoint(&[repository, snapshot_id])?;
        let response = self.send(
            OP_DELETE_SNAPSHOT,
            self.http.delete(url),
            self.timeouts.delete,
        )?;
        Self::read_json(OP_DELETE_SNAPSHOT, response)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn create_snapshot(&self, repository: &str, snapshot_id: &str) -> Result<CreateResponse> {
        let url = self.endpoint(&[repository, snapshot_id])?;
        let request = self
            .http
            .put(url)
            .query(&[("wait_for_completion", "true")]);
        let response = self.send(OP_CREATE_SNAPSHOT, request, self.timeouts.create)?;

        let http_status = response.status().as_u16();
        // Body is drained but not examined; the status check decides.
        if let Err(err) = response.text() {
            tracing::debug!(op = OP_CREATE_SNAPSHOT, error = %err, "create response body unreadable");
        }
        Ok(CreateResponse { http_status })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn snapshot_status(&self, repository: &str, snapshot_id: &str) -> Result<Vec<Snapshot>> {
        let url = self.endpoint(&[repository, snapshot_id])?;
        let response = self.send(
            OP_SNAPSHOT_STATUS,
            self.http.get(url),
            self.timeouts.status,
        )?;
        let list: SnapshotList = Self::read_json(OP_SNAPSHOT_STATUS, response)?;
        Ok(list.snapshots)
    }
}
