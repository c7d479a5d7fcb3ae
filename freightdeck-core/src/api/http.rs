//! Blocking REST client for the schedule API.
//!
//! Every authenticated request carries a bearer token. A 403 triggers
//! exactly one refresh-then-retry; if the refresh fails the session is
//! cleared and the caller gets [`ApiError::SessionExpired`]. There is no
//! other automatic retry, no cancellation, and no de-duplication.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::api::session::SessionStore;
use crate::api::{ApiError, DestinationScope, ScheduleApi};
use crate::cascade::ScheduleQuery;
use crate::domain::{Country, Port, Schedule, ScheduleDraft, User, Vessel};
use crate::schema::{
    Envelope, InviteRequest, LoginRequest, RefreshRequest, TokenPair, UploadMode, UploadReport,
    UserEdit,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The one real [`ScheduleApi`] implementation.
pub struct HttpApi {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self::with_timeout(base_url, session, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        session: SessionStore,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send an authenticated request, retrying once after a token refresh
    /// if the server answers 403.
    fn send_authed(
        &self,
        build: &dyn Fn(&Client) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let token = self.session.access_token().ok_or(ApiError::NotLoggedIn)?;
        let resp = Self::send(build(&self.client).bearer_auth(&token))?;

        if resp.status() != StatusCode::FORBIDDEN {
            return Ok(resp);
        }

        // Single best-effort refresh, then one retry.
        self.refresh()?;
        let token = self.session.access_token().ok_or(ApiError::SessionExpired)?;
        Self::send(build(&self.client).bearer_auth(&token))
    }

    fn send(req: RequestBuilder) -> Result<Response, ApiError> {
        req.send().map_err(|e| ApiError::Network(e.to_string()))
    }

    fn refresh(&self) -> Result<(), ApiError> {
        let refresh_token = self.session.refresh_token().ok_or_else(|| {
            self.session.clear();
            ApiError::SessionExpired
        })?;

        let resp = Self::send(
            self.client
                .post(self.url("auth/refresh"))
                .json(&RefreshRequest { refresh_token }),
        );

        match resp.and_then(decode_body::<TokenPair>) {
            Ok(pair) => self.session.set(pair),
            Err(_) => {
                self.session.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.send_authed(&|c: &Client| c.get(&url).query(query))?;
        decode_body(resp)
    }

    fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.send_authed(&|c: &Client| c.post(&url).json(body))?;
        decode_body(resp)
    }

    fn put_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.send_authed(&|c: &Client| c.put(&url).json(body))?;
        decode_body(resp)
    }

    fn delete_empty(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        let resp = self.send_authed(&|c: &Client| c.delete(&url))?;
        decode_empty(resp)
    }
}

/// Decode a response into the envelope's data payload.
fn decode_body<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    let text = resp.text().map_err(|e| ApiError::Network(e.to_string()))?;
    decode_envelope(status, &text)
}

/// Decode a response where no data payload is expected.
fn decode_empty(resp: Response) -> Result<(), ApiError> {
    let status = resp.status();
    let text = resp.text().map_err(|e| ApiError::Network(e.to_string()))?;
    check_envelope(status, &text)
}

fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: server_message(body)
                .unwrap_or_else(|| format!("request failed (HTTP {status})")),
        });
    }
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if let Some(error) = envelope.error {
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: error,
        });
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Decode("envelope has no data".into()))
}

fn check_envelope(status: StatusCode, body: &str) -> Result<(), ApiError> {
    if !status.is_success() {
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: server_message(body)
                .unwrap_or_else(|| format!("request failed (HTTP {status})")),
        });
    }
    // Some endpoints answer with an empty body; only reject an explicit
    // envelope-level error.
    if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        if let Some(error) = envelope.error {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error,
            });
        }
    }
    Ok(())
}

/// Pull the server's own message out of an error body, if it sent one.
fn server_message(body: &str) -> Option<String> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).ok()?;
    envelope.error.or(envelope.message)
}

fn schedule_query_params(query: &ScheduleQuery) -> Vec<(&'static str, String)> {
    match query {
        ScheduleQuery::ByVessel {
            vessel_id,
            voyage,
            transit,
            destination,
        } => vec![
            ("vessel", vessel_id.clone()),
            ("voyage", voyage.clone()),
            ("transit", transit.clone()),
            ("destination", destination.clone()),
        ],
        ScheduleQuery::ByOrigin {
            country_id,
            port_id,
            destination,
        } => vec![
            ("country", country_id.clone()),
            ("port", port_id.clone()),
            ("destination", destination.clone()),
        ],
    }
}

impl ScheduleApi for HttpApi {
    fn vessels(&self) -> Result<Vec<Vessel>, ApiError> {
        self.get_json("vessels", &[])
    }

    fn countries(&self) -> Result<Vec<Country>, ApiError> {
        self.get_json("countries", &[])
    }

    fn ports(&self, country_id: Option<&str>) -> Result<Vec<Port>, ApiError> {
        let query = match country_id {
            Some(c) => vec![("country", c.to_string())],
            None => vec![],
        };
        self.get_json("ports", &query)
    }

    fn voyages(&self, vessel_id: &str) -> Result<Vec<String>, ApiError> {
        self.get_json("voyages", &[("vessel", vessel_id.to_string())])
    }

    fn transits(&self, vessel_id: &str, voyage: &str) -> Result<Vec<String>, ApiError> {
        self.get_json(
            "transits",
            &[
                ("vessel", vessel_id.to_string()),
                ("voyage", voyage.to_string()),
            ],
        )
    }

    fn destinations(&self, scope: &DestinationScope) -> Result<Vec<String>, ApiError> {
        let query = match scope {
            DestinationScope::Vessel {
                vessel_id,
                voyage,
                transit,
            } => vec![
                ("vessel", vessel_id.clone()),
                ("voyage", voyage.clone()),
                ("transit", transit.clone()),
            ],
            DestinationScope::Origin {
                transit,
                country_id,
            } => vec![
                ("transit", transit.clone()),
                ("country", country_id.clone()),
            ],
        };
        self.get_json("destinations", &query)
    }

    fn schedules(&self, query: Option<&ScheduleQuery>) -> Result<Vec<Schedule>, ApiError> {
        let params = query.map(schedule_query_params).unwrap_or_default();
        self.get_json("schedules", &params)
    }

    fn schedule(&self, id: &str) -> Result<Schedule, ApiError> {
        self.get_json(&format!("schedules/{id}"), &[])
    }

    fn create_schedule(&self, draft: &ScheduleDraft) -> Result<Schedule, ApiError> {
        self.post_json("schedules", draft)
    }

    fn update_schedule(&self, id: &str, draft: &ScheduleDraft) -> Result<Schedule, ApiError> {
        self.put_json(&format!("schedules/{id}"), draft)
    }

    fn delete_schedule(&self, id: &str) -> Result<(), ApiError> {
        self.delete_empty(&format!("schedules/{id}"))
    }

    fn upload_schedules(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        overwrite: bool,
        mode: UploadMode,
    ) -> Result<UploadReport, ApiError> {
        let url = self.url("schedules/upload");
        let name = file_name.to_string();
        let resp = self.send_authed(&move |c: &Client| {
            // The form cannot be reused across the refresh retry, so each
            // attempt rebuilds it from a fresh copy of the bytes.
            let part = Part::bytes(bytes.clone())
                .file_name(name.clone())
                .mime_str("application/octet-stream")
                .expect("static mime type is valid");
            let form = Form::new()
                .part("file", part)
                .text("overwrite", if overwrite { "true" } else { "false" })
                .text("mode", mode.as_str());
            c.post(&url).multipart(form)
        })?;
        decode_body(resp)
    }

    fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("users", &[])
    }

    fn invite_user(&self, invite: &InviteRequest) -> Result<User, ApiError> {
        self.post_json("users/invite", invite)
    }

    fn update_user(&self, id: &str, edit: &UserEdit) -> Result<User, ApiError> {
        self.put_json(&format!("users/{id}"), edit)
    }

    fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.delete_empty(&format!("users/{id}"))
    }

    fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let resp = Self::send(self.client.post(self.url("auth/login")).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))?;
        let pair: TokenPair = decode_body(resp)?;
        self.session.set(pair)
    }

    fn logout(&self) -> Result<(), ApiError> {
        // Best effort server side; the local session is cleared regardless.
        if let Some(token) = self.session.access_token() {
            let _ = Self::send(self.client.post(self.url("auth/logout")).bearer_auth(token));
        }
        self.session.clear();
        Ok(())
    }

    fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_unwraps_envelope_data() {
        let body = r#"{"data":[{"id":"v1","name":"MAERSK ONE"}]}"#;
        let vessels: Vec<Vessel> = decode_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(vessels.len(), 1);
        assert_eq!(vessels[0].name, "MAERSK ONE");
    }

    #[test]
    fn envelope_error_becomes_api_error() {
        let body = r#"{"data":null,"error":"voyage not found"}"#;
        let err = decode_envelope::<Vec<Vessel>>(StatusCode::OK, body).unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "voyage not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_success_uses_server_message() {
        let body = r#"{"data":null,"message":"ETD must be before ETA"}"#;
        let err = decode_envelope::<Vec<Vessel>>(StatusCode::UNPROCESSABLE_ENTITY, body)
            .unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "ETD must be before ETA");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_success_without_body_gets_generic_message() {
        let err = decode_envelope::<Vec<Vessel>>(StatusCode::INTERNAL_SERVER_ERROR, "")
            .unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_data_is_a_decode_error() {
        let err = decode_envelope::<Vec<Vessel>>(StatusCode::OK, r#"{"data":null}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn empty_check_accepts_blank_body() {
        assert!(check_envelope(StatusCode::OK, "").is_ok());
        assert!(check_envelope(StatusCode::OK, r#"{"data":null,"message":"deleted"}"#).is_ok());
    }

    #[test]
    fn upload_report_decodes_through_envelope() {
        let body = r#"{"data":{"total":10,"created":7,"updated":2,"failed":1,
            "errors":[{"row":{"voyage":"012E"},"error":"invalid ETD"}]}}"#;
        let report: UploadReport = decode_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row["voyage"], "012E");
    }

    #[test]
    fn vessel_query_params_cover_all_four_levels() {
        let q = ScheduleQuery::ByVessel {
            vessel_id: "v1".into(),
            voyage: "012E".into(),
            transit: "Dubai".into(),
            destination: "Europe".into(),
        };
        let params = schedule_query_params(&q);
        assert_eq!(
            params,
            vec![
                ("vessel", "v1".to_string()),
                ("voyage", "012E".to_string()),
                ("transit", "Dubai".to_string()),
                ("destination", "Europe".to_string()),
            ]
        );
    }
}
