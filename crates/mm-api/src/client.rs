//! Blocking HTTP client for one analytics-server instance

use crate::error::{ApiError, ApiResult};
use crate::traits::{DestinationApi, SourceReader};
use mm_core::config::{CollectionRef, Credentials};
use mm_core::model::{
    Card, Collection, Dashboard, DashboardCard, DashboardSummary, Field, Metric, Table,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

const SESSION_HEADER: &str = "X-Metabase-Session";

/// Authenticated session against one instance
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl Client {
    /// Authenticate against `base_url` and hold the session token for all
    /// subsequent calls
    pub fn connect(credentials: &Credentials) -> ApiResult<Self> {
        let http = reqwest::blocking::Client::new();
        let url = format!("{}/api/session", credentials.base_url);
        log::debug!("POST {url}");
        let response = http
            .post(&url)
            .json(&json!({
                "username": credentials.username,
                "password": credentials.password,
            }))
            .send()?;

        let auth_failed = || ApiError::AuthFailed {
            username: credentials.username.clone(),
            base_url: credentials.base_url.clone(),
        };
        // a credential rejection reports as an auth failure; anything else
        // (500, proxy page, rate limit) keeps its status and body
        if Self::credentials_rejected(response.status().as_u16()) {
            return Err(auth_failed());
        }
        let body: Value = Self::decode(&url, Self::check("POST", &url, response)?)?;
        let Some(token) = Self::session_token(&body) else {
            return Err(auth_failed());
        };

        Ok(Self {
            http,
            base_url: credentials.base_url.clone(),
            token: token.to_string(),
        })
    }

    /// Statuses the session endpoint uses to reject credentials; anything
    /// else non-successful is an ordinary request failure
    fn credentials_rejected(status: u16) -> bool {
        matches!(status, 401 | 403)
    }

    fn session_token(body: &Value) -> Option<&str> {
        body.get("id").and_then(Value::as_str)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        log::debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .header(SESSION_HEADER, &self.token)
            .send()?;
        Self::decode(&url, Self::check("GET", &url, response)?)
    }

    fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> ApiResult<T> {
        let url = self.url(path);
        log::debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .header(SESSION_HEADER, &self.token)
            .json(body)
            .send()?;
        Self::decode(&url, Self::check("POST", &url, response)?)
    }

    fn put(&self, path: &str, body: &impl Serialize) -> ApiResult<()> {
        let url = self.url(path);
        log::debug!("PUT {url}");
        let response = self
            .http
            .put(&url)
            .header(SESSION_HEADER, &self.token)
            .json(body)
            .send()?;
        Self::check("PUT", &url, response)?;
        Ok(())
    }

    /// Delete a card; used by the flush command
    pub fn delete_card(&self, card_id: u64) -> ApiResult<()> {
        let url = self.url(&format!("card/{card_id}"));
        log::debug!("DELETE {url}");
        let response = self
            .http
            .delete(&url)
            .header(SESSION_HEADER, &self.token)
            .send()?;
        Self::check("DELETE", &url, response)?;
        Ok(())
    }

    /// The server's success statuses differ per verb: GET must return 200,
    /// POST allows 200/201/202, PUT anything below 400, DELETE 204.
    fn check(
        method: &'static str,
        url: &str,
        response: reqwest::blocking::Response,
    ) -> ApiResult<reqwest::blocking::Response> {
        let status = response.status().as_u16();
        let ok = match method {
            "GET" => status == 200,
            "POST" => matches!(status, 200 | 201 | 202),
            "PUT" => status < 400,
            "DELETE" => status == 204,
            _ => unreachable!("unsupported method {method}"),
        };
        if ok {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(ApiError::Request {
                method,
                url: url.to_string(),
                status,
                body,
            })
        }
    }

    fn decode<T: DeserializeOwned>(url: &str, response: reqwest::blocking::Response) -> ApiResult<T> {
        let text = response.text()?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn id_of(url: &str, body: &Value) -> ApiResult<u64> {
        body.get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ApiError::Decode {
                url: url.to_string(),
                message: "response has no numeric id".to_string(),
            })
    }

    /// All collections (export command)
    pub fn collections(&self) -> ApiResult<Vec<Collection>> {
        self.get("collection")
    }

    /// All cards (export and flush commands)
    pub fn cards(&self) -> ApiResult<Vec<Card>> {
        self.get("card")
    }
}

/// Layout-and-mappings subset the dashboard cards endpoint accepts.
/// Extra placement fields the detail endpoint serves are rejected here,
/// so the patch is built explicitly.
pub(crate) fn placement_patch(placement: &DashboardCard) -> Value {
    json!({
        "cards": [{
            "id": placement.id,
            "row": placement.row,
            "col": placement.col,
            "sizeX": placement.size_x,
            "sizeY": placement.size_y,
            "series": placement.series,
            "visualization_settings": placement.visualization_settings,
            "parameter_mappings": placement.parameter_mappings,
        }]
    })
}

impl SourceReader for Client {
    fn collection_name(&self, collection: &CollectionRef) -> ApiResult<String> {
        let path = format!("collection/{collection}");
        let url = self.url(&path);
        let detail: Value = self.get(&path)?;
        detail
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode {
                url,
                message: "collection has no name".to_string(),
            })
    }

    fn collection_dashboards(
        &self,
        collection: &CollectionRef,
    ) -> ApiResult<Vec<DashboardSummary>> {
        let path = format!("collection/{collection}/items?models=dashboard");
        let url = self.url(&path);
        let listing: Value = self.get(&path)?;
        let data = listing.get("data").cloned().unwrap_or(Value::Array(vec![]));
        serde_json::from_value(data).map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }

    fn dashboard(&self, dashboard_id: u64) -> ApiResult<Dashboard> {
        self.get(&format!("dashboard/{dashboard_id}"))
    }

    fn card(&self, card_id: u64) -> ApiResult<Card> {
        self.get(&format!("card/{card_id}"))
    }

    fn table(&self, table_id: u64) -> ApiResult<Table> {
        self.get(&format!("table/{table_id}"))
    }

    fn field(&self, field_id: u64) -> ApiResult<Field> {
        self.get(&format!("field/{field_id}"))
    }

    fn metric(&self, metric_id: u64) -> ApiResult<Metric> {
        self.get(&format!("metric/{metric_id}"))
    }
}

impl DestinationApi for Client {
    fn tables(&self) -> ApiResult<Vec<Table>> {
        self.get("table")
    }

    fn table_fields(&self, table_id: u64) -> ApiResult<Vec<Field>> {
        let path = format!("table/{table_id}/query_metadata");
        let url = self.url(&path);
        let metadata: Value = self.get(&path)?;
        let fields = metadata
            .get("fields")
            .cloned()
            .unwrap_or(Value::Array(vec![]));
        serde_json::from_value(fields).map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }

    fn metrics(&self) -> ApiResult<Vec<Metric>> {
        self.get("metric")
    }

    fn create_collection(&self, name: &str) -> ApiResult<Collection> {
        self.post(
            "collection",
            &json!({
                "name": name,
                "color": "#000000",
                "description": null,
            }),
        )
    }

    fn create_dashboard(&self, dashboard: &Dashboard) -> ApiResult<u64> {
        let url = self.url("dashboard");
        let created: Value = self.post("dashboard", dashboard)?;
        Self::id_of(&url, &created)
    }

    fn update_dashboard_parameters(
        &self,
        dashboard_id: u64,
        parameters: &[Value],
    ) -> ApiResult<()> {
        self.put(
            &format!("dashboard/{dashboard_id}"),
            &json!({ "parameters": parameters }),
        )
    }

    fn create_card(&self, card: &Card) -> ApiResult<Card> {
        self.post("card", card)
    }

    fn add_dashboard_card(&self, dashboard_id: u64, card_id: Option<u64>) -> ApiResult<u64> {
        let path = format!("dashboard/{dashboard_id}/cards");
        let url = self.url(&path);
        let created: Value = self.post(&path, &json!({ "cardId": card_id }))?;
        Self::id_of(&url, &created)
    }

    fn update_dashboard_card(&self, dashboard_id: u64, placement: &DashboardCard) -> ApiResult<()> {
        self.put(
            &format!("dashboard/{dashboard_id}/cards"),
            &placement_patch(placement),
        )
    }

    fn update_field(&self, field_id: u64, patch: &Value) -> ApiResult<()> {
        self.put(&format!("field/{field_id}"), patch)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
