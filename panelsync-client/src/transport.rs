use std::sync::Arc;

use async_trait::async_trait;
use panelsync_core::config::ClientConfig;
use panelsync_core::cookies::read_cookie;
use panelsync_protocol::entity::{EntityDescriptor, EntityOperation};
use panelsync_protocol::mutation::{MutationRequest, MutationResponse};
use panelsync_protocol::query::ListQuery;
use panelsync_protocol::record::ListSnapshot;
use reqwest::cookie::{CookieStore, Jar};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ClientError;

const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");
const CSRF_HEADER: &str = "X-CSRFToken";
const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

/// Read and write access to the dashboard backend.
#[async_trait]
pub trait ListTransport: Send + Sync {
    async fn fetch_list(
        &self,
        entity: &EntityDescriptor,
        query: &ListQuery,
    ) -> Result<ListSnapshot, ClientError>;

    /// Sends a mutation and returns the decoded reply, including replies
    /// that report `success: false`.
    async fn send_mutation(
        &self,
        entity: &EntityDescriptor,
        request: &MutationRequest,
    ) -> Result<MutationResponse, ClientError>;
}

/// Typed HTTP client bound to the backend base URL. Cookies set by the
/// backend are kept in a shared jar and the anti-forgery token is read from
/// it on every mutating request.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    cookies: Arc<Jar>,
    csrf_cookie: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::from_reqwest)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            cookies,
            csrf_cookie: config.csrf_cookie_name.clone(),
        })
    }

    /// Stores a `Set-Cookie` style value for the backend origin.
    pub fn set_cookie(&self, cookie: &str) {
        self.cookies.add_cookie_str(cookie, &self.base_url);
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current anti-forgery token, looked up fresh because it may rotate.
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        let header = header.to_str().ok()?;
        read_cookie(header, &self.csrf_cookie)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })
    }
}

#[async_trait]
impl ListTransport for HttpTransport {
    async fn fetch_list(
        &self,
        entity: &EntityDescriptor,
        query: &ListQuery,
    ) -> Result<ListSnapshot, ClientError> {
        let url = self.endpoint(&entity.list_path)?;
        let params = query.to_params(entity);
        debug!(entity = %entity.plural, %url, ?params, "fetching list");

        let response = self
            .http
            .get(url)
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1)
            .query(&params)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let payload = read_json(response).await?;
        ListSnapshot::from_response(&entity.list_key, payload)
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    async fn send_mutation(
        &self,
        entity: &EntityDescriptor,
        request: &MutationRequest,
    ) -> Result<MutationResponse, ClientError> {
        let path = request
            .endpoint(entity)
            .ok_or_else(|| ClientError::Unsupported {
                entity: entity.name.clone(),
                operation: request.kind().operation(),
            })?;
        let url = self.endpoint(&path)?;

        let token = self
            .csrf_token()
            .ok_or_else(|| ClientError::MissingCsrfToken {
                cookie: self.csrf_cookie.clone(),
            })?;

        let builder = self
            .http
            .post(url.clone())
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1)
            .header(CSRF_HEADER, token.as_str());

        let builder = match request {
            MutationRequest::Create { form } | MutationRequest::Update { form, .. } => {
                builder.form(form.fields())
            }
            MutationRequest::Delete { .. } => builder.form(&[(CSRF_FORM_FIELD, token.as_str())]),
            MutationRequest::BulkDelete { ids } => {
                builder.json(&MutationRequest::bulk_body(entity, ids))
            }
        };

        debug!(
            entity = %entity.name,
            kind = %request.kind(),
            %url,
            "sending mutation"
        );

        let response = builder.send().await.map_err(ClientError::from_reqwest)?;
        let payload = read_json(response).await?;
        MutationResponse::from_value(entity, payload)
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: response.status(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|err| ClientError::Decode(err.to_string()))
}

/// Guard used by dispatchers before touching the network.
pub(crate) fn ensure_supported(
    entity: &EntityDescriptor,
    operation: EntityOperation,
) -> Result<(), ClientError> {
    if entity.supports(operation) {
        Ok(())
    } else {
        Err(ClientError::Unsupported {
            entity: entity.name.clone(),
            operation,
        })
    }
}
