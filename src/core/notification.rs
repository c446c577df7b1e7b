//! Scaling engine notification client.
//!
//! A start transition upserts the active schedule with `PUT`; a stop
//! transition removes it with `DELETE` on the same resource:
//!
//! ```text
//! {scaling_engine_url}/v1/apps/{app_id}/active_schedules/{schedule_id}
//! ```
//!
//! The response is folded into a [`NotificationOutcome`]. Only
//! [`NotificationOutcome::ConnectivityError`] leaves the remote state unknown.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::core::error::ExecutorError;
use crate::core::schedule::{ActiveScheduleEntity, ScheduleAction};

/// Classified result of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Any 2xx response.
    Success,
    /// 4xx response: the engine rejected the request itself.
    ClientError {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// Any other non-2xx response.
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// The request may not have reached the engine (timeout, DNS, refused).
    ConnectivityError {
        /// Transport error description.
        cause: String,
    },
}

impl NotificationOutcome {
    /// Fold an HTTP status and body into an outcome.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        if status.is_success() {
            Self::Success
        } else if status.is_client_error() {
            Self::ClientError {
                status: status.as_u16(),
                body: body.into(),
            }
        } else {
            Self::ServerError {
                status: status.as_u16(),
                body: body.into(),
            }
        }
    }

    /// Whether the remote side may not have seen the request.
    pub const fn is_indeterminate(&self) -> bool {
        matches!(self, Self::ConnectivityError { .. })
    }
}

impl fmt::Display for NotificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::ClientError { status, body } => write!(f, "client error {status}: {body}"),
            Self::ServerError { status, body } => write!(f, "server error {status}: {body}"),
            Self::ConnectivityError { cause } => write!(f, "connectivity error: {cause}"),
        }
    }
}

/// Delivers schedule transitions to the scaling engine.
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// Send one transition. Never fails; every failure is an outcome.
    async fn notify(
        &self,
        action: ScheduleAction,
        active_schedule: &ActiveScheduleEntity,
    ) -> NotificationOutcome;
}

/// HTTP client for the scaling engine's active-schedule resource.
#[derive(Debug, Clone)]
pub struct ScalingEngineClient {
    base_url: String,
    http: reqwest::Client,
}

impl ScalingEngineClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    ///
    /// Redirects are not followed: a 3xx answer is classified like any other
    /// non-2xx status instead of re-sending the transition elsewhere.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExecutorError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self::with_http_client(base_url, http))
    }

    /// Create a client reusing an existing `reqwest::Client`.
    ///
    /// The client should be built with `redirect::Policy::none()`; otherwise a
    /// 3xx answer is followed and the target's status is reported instead.
    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    /// Resource URL for one active schedule.
    pub fn active_schedule_url(&self, app_id: &str, schedule_id: i64) -> String {
        format!(
            "{}/v1/apps/{app_id}/active_schedules/{schedule_id}",
            self.base_url
        )
    }
}

#[async_trait]
impl NotificationClient for ScalingEngineClient {
    async fn notify(
        &self,
        action: ScheduleAction,
        active_schedule: &ActiveScheduleEntity,
    ) -> NotificationOutcome {
        let app_id = active_schedule.app_id.as_str();
        let schedule_id = active_schedule.id;
        let url = self.active_schedule_url(app_id, schedule_id);

        let request = match action {
            ScheduleAction::Start => {
                tracing::info!(app_id, schedule_id, %action, "starting active schedule on scaling engine");
                self.http.put(&url)
            }
            ScheduleAction::Stop => {
                tracing::info!(app_id, schedule_id, %action, "removing active schedule from scaling engine");
                self.http.delete(&url)
            }
        };

        let response = match request.json(active_schedule).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    app_id,
                    schedule_id,
                    %action,
                    error = %e,
                    timeout = e.is_timeout(),
                    connect = e.is_connect(),
                    "scaling engine unreachable"
                );
                return NotificationOutcome::ConnectivityError {
                    cause: e.to_string(),
                };
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::info!(app_id, schedule_id, %action, %status, "scaling engine notified");
            return NotificationOutcome::Success;
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let outcome = NotificationOutcome::from_status(status, body);
        match &outcome {
            NotificationOutcome::ClientError { body, .. } => tracing::error!(
                app_id,
                schedule_id,
                %action,
                %status,
                body = %body,
                "scaling engine rejected notification (client error)"
            ),
            NotificationOutcome::ServerError { body, .. } => tracing::error!(
                app_id,
                schedule_id,
                %action,
                %status,
                body = %body,
                "scaling engine notification failed"
            ),
            NotificationOutcome::Success | NotificationOutcome::ConnectivityError { .. } => {}
        }
        outcome
    }
}
