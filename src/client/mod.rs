//! Client layer: the throttle-aware sender.
//!
//! One [`NexmoClient::send_message`] call resolves a whole logical message:
//! credentials are checked up front, the text is classified and segmented
//! once, and parts go out strictly in order. A part is retried only for the
//! provider's rate-limit signal, up to three attempts in total; any other
//! failure ends the message immediately with the pessimistic status.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::channel::{ChannelConfig, ConfigError};
use crate::domain::{
    EncodingMode, ExternalMessageId, OutboundMessage, OutboundStatus, SendAttempt, segment,
};
use crate::transport::{
    SEND_URL, STATUS_SUCCESS, SendForm, decode_send_response, encode_send_form, throttle_delay,
};

/// Attempt budget per part, throttle retries included.
const MAX_SEND_ATTEMPTS: u8 = 3;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

enum PartOutcome {
    Sent,
    Failed,
}

#[derive(Debug, Clone)]
/// Builder for [`NexmoClient`].
///
/// Use this when you need to customize the endpoint, timeout, or user-agent.
pub struct NexmoClientBuilder {
    send_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl NexmoClientBuilder {
    /// Create a builder with the default endpoint and no timeout/user-agent override.
    pub fn new() -> Self {
        Self {
            send_url: SEND_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the send endpoint URL.
    pub fn send_url(mut self, url: impl Into<String>) -> Self {
        self.send_url = url.into();
        self
    }

    /// Set an HTTP client timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`NexmoClient`].
    pub fn build(self) -> Result<NexmoClient, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder.build()?;

        Ok(NexmoClient {
            send_url: self.send_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

impl Default for NexmoClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
/// Submits outbound messages to the provider's send endpoint.
///
/// Cheap to clone; holds no per-send state, so one client can serve many
/// concurrent sends across channels.
pub struct NexmoClient {
    send_url: String,
    http: Arc<dyn HttpTransport>,
}

impl NexmoClient {
    /// Create a client with the default endpoint.
    ///
    /// For more customization, use [`NexmoClient::builder`].
    pub fn new() -> Self {
        Self {
            send_url: SEND_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder() -> NexmoClientBuilder {
        NexmoClientBuilder::new()
    }

    /// Send one logical message, returning its aggregate delivery status.
    ///
    /// The encoding mode is computed once over the full text and applied to
    /// every part. Parts are submitted sequentially; the first transport
    /// error or non-success provider code finalizes the status as errored
    /// and leaves the remaining parts unsent. Transport and provider
    /// failures are reported through the returned [`OutboundStatus`], not as
    /// `Err` — the error path is reserved for configuration problems caught
    /// before any request is made.
    pub async fn send_message(
        &self,
        channel: &ChannelConfig,
        msg: &OutboundMessage,
    ) -> Result<OutboundStatus, ConfigError> {
        let credentials = channel.credentials()?;
        let callback = channel.status_callback_url()?;
        let mode = EncodingMode::classify(msg.text());

        let mut status = OutboundStatus::errored();
        let parts = segment(msg.text(), msg.max_part_length());
        for (idx, part) in parts.iter().enumerate() {
            let form = encode_send_form(&SendForm {
                api_key: &credentials.api_key,
                api_secret: &credentials.api_secret,
                from: channel.address(),
                to: msg.destination(),
                text: part,
                callback: &callback,
                mode,
            });
            match self.submit_part(idx, form, &mut status).await {
                PartOutcome::Sent => {}
                PartOutcome::Failed => return Ok(status),
            }
        }

        tracing::debug!(
            channel = channel.id().as_str(),
            parts = parts.len(),
            "message wired"
        );
        status.mark_wired();
        Ok(status)
    }

    /// Submit one part, driving the bounded throttle-retry loop.
    async fn submit_part(
        &self,
        part: usize,
        form: Vec<(String, String)>,
        status: &mut OutboundStatus,
    ) -> PartOutcome {
        for retry in 0..MAX_SEND_ATTEMPTS {
            let response = match self.http.post_form(&self.send_url, form.clone()).await {
                Ok(response) => response,
                Err(err) => {
                    // transport failures are terminal, only throttle responses retry
                    status.record_attempt(SendAttempt {
                        retry,
                        error: Some(err.to_string()),
                        ..SendAttempt::default()
                    });
                    tracing::warn!(part, error = %err, "message send failed");
                    return PartOutcome::Failed;
                }
            };

            let throttled = throttle_delay(&response.body);
            let decoded = decode_send_response(&response.body).unwrap_or_default();
            let external_id = decoded
                .external_id
                .as_deref()
                .and_then(|id| ExternalMessageId::new(id).ok());
            status.record_attempt(SendAttempt {
                retry,
                http_status: Some(response.status),
                body: Some(response.body),
                error: None,
                provider_status: decoded.status.clone(),
                external_id: external_id.clone(),
            });

            if let Some(wait) = throttled {
                tracing::debug!(
                    part,
                    wait_ms = wait.as_millis() as u64,
                    "throughput rate exceeded, backing off"
                );
                tokio::time::sleep(wait).await;
                if retry + 1 < MAX_SEND_ATTEMPTS {
                    continue;
                }
                // budget exhausted: the throttled response is accepted as final
            }

            if decoded.status.as_deref() != Some(STATUS_SUCCESS) {
                tracing::warn!(
                    part,
                    provider_status = ?decoded.status,
                    "received error status from provider"
                );
                return PartOutcome::Failed;
            }
            if let Some(id) = external_id {
                status.set_external_id(id);
            }
            return PartOutcome::Sent;
        }

        PartOutcome::Failed
    }
}

impl Default for NexmoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::channel::{CONFIG_API_KEY, CONFIG_API_SECRET};
    use crate::domain::{ChannelId, DeliveryStatus, TelAddress};

    use super::*;

    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    struct FakeTransportState {
        requests: Vec<Vec<(String, String)>>,
        responses: VecDeque<Result<HttpResponse, String>>,
    }

    impl FakeTransport {
        fn new(responses: Vec<Result<(u16, &str), &str>>) -> Arc<Self> {
            Arc::new(Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    requests: Vec::new(),
                    responses: responses
                        .into_iter()
                        .map(|r| {
                            r.map(|(status, body)| HttpResponse {
                                status,
                                body: body.to_owned(),
                            })
                            .map_err(str::to_owned)
                        })
                        .collect(),
                })),
            })
        }

        fn requests(&self) -> Vec<Vec<(String, String)>> {
            self.state.lock().unwrap().requests.clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_form<'a>(
            &'a self,
            _url: &'a str,
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                state.requests.push(params);
                match state.responses.pop_front().expect("unexpected extra request") {
                    Ok(response) => Ok(response),
                    Err(err) => Err(err.into()),
                }
            })
        }
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn channel() -> ChannelConfig {
        ChannelConfig::new(
            ChannelId::new("8eb23e93-5ecb-45ba-b726-3b064e0c56ab").unwrap(),
            TelAddress::new("+2020").unwrap(),
            "example.com",
        )
        .with_config(CONFIG_API_KEY, "nexmo-key")
        .with_config(CONFIG_API_SECRET, "nexmo-secret")
    }

    fn message(text: &str) -> OutboundMessage {
        OutboundMessage::new(TelAddress::new("+250788383383").unwrap(), text)
    }

    fn make_client(transport: Arc<FakeTransport>) -> NexmoClient {
        NexmoClient {
            send_url: "https://example.invalid/sms/json".to_owned(),
            http: transport,
        }
    }

    const OK_BODY: &str = r#"{"messages":[{"status":"0","message-id":"1002"}]}"#;

    fn throttled_body(millis: u64) -> String {
        format!(
            r#"{{"messages":[{{"status":"1","error-text":"Throughput Rate Exceeded - please wait [ {millis} ] and retry"}}]}}"#
        )
    }

    #[tokio::test]
    async fn single_part_success_is_wired() {
        let transport = FakeTransport::new(vec![Ok((200, OK_BODY))]);
        let client = make_client(transport.clone());

        let status = client
            .send_message(&channel(), &message("Simple message"))
            .await
            .unwrap();

        assert_eq!(status.status(), DeliveryStatus::Wired);
        assert_eq!(status.external_id().unwrap().as_str(), "1002");
        assert_eq!(status.attempts().len(), 1);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(param(&requests[0], "api_key"), Some("nexmo-key"));
        assert_eq!(param(&requests[0], "api_secret"), Some("nexmo-secret"));
        assert_eq!(param(&requests[0], "from"), Some("2020"));
        assert_eq!(param(&requests[0], "to"), Some("250788383383"));
        assert_eq!(param(&requests[0], "text"), Some("Simple message"));
        assert_eq!(param(&requests[0], "status-report-req"), Some("1"));
        assert_eq!(
            param(&requests[0], "callback"),
            Some("https://example.com/c/nx/8eb23e93-5ecb-45ba-b726-3b064e0c56ab/status")
        );
        assert_eq!(param(&requests[0], "type"), Some("text"));
    }

    #[tokio::test]
    async fn unicode_text_sets_the_unicode_type_tag_on_every_part() {
        let text = format!("{}☺", "a".repeat(1600));
        let transport = FakeTransport::new(vec![Ok((200, OK_BODY)), Ok((200, OK_BODY))]);
        let client = make_client(transport.clone());

        let status = client.send_message(&channel(), &message(&text)).await.unwrap();
        assert_eq!(status.status(), DeliveryStatus::Wired);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(param(&requests[0], "type"), Some("unicode"));
        assert_eq!(param(&requests[1], "type"), Some("unicode"));
    }

    #[tokio::test]
    async fn multipart_success_keeps_the_last_external_id() {
        let text = "x".repeat(3200);
        let transport = FakeTransport::new(vec![
            Ok((200, r#"{"messages":[{"status":"0","message-id":"ABC"}]}"#)),
            Ok((200, r#"{"messages":[{"status":"0","message-id":"DEF"}]}"#)),
        ]);
        let client = make_client(transport.clone());

        let status = client.send_message(&channel(), &message(&text)).await.unwrap();

        assert_eq!(status.status(), DeliveryStatus::Wired);
        assert_eq!(status.external_id().unwrap().as_str(), "DEF");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(param(&requests[0], "text").unwrap().chars().count(), 1600);
        assert_eq!(param(&requests[1], "text").unwrap().chars().count(), 1600);
    }

    #[tokio::test]
    async fn failing_part_halts_submission_and_keeps_the_earlier_id() {
        // three parts; the second fails, so the third is never submitted
        let text = "x".repeat(4800);
        let transport = FakeTransport::new(vec![
            Ok((200, r#"{"messages":[{"status":"0","message-id":"ABC"}]}"#)),
            Ok((200, r#"{"messages":[{"status":"1"}]}"#)),
            Ok((200, OK_BODY)),
        ]);
        let client = make_client(transport.clone());

        let status = client.send_message(&channel(), &message(&text)).await.unwrap();

        assert_eq!(status.status(), DeliveryStatus::Errored);
        assert_eq!(status.external_id().unwrap().as_str(), "ABC");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn transport_error_is_immediately_terminal() {
        let text = "x".repeat(3200);
        let transport = FakeTransport::new(vec![Err("connection refused")]);
        let client = make_client(transport.clone());

        let status = client.send_message(&channel(), &message(&text)).await.unwrap();

        assert_eq!(status.status(), DeliveryStatus::Errored);
        assert!(status.external_id().is_none());
        assert_eq!(transport.requests().len(), 1);

        let attempts = status.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].error.as_deref(), Some("connection refused"));
        assert!(attempts[0].body.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_retries_are_bounded_at_three_attempts() {
        let bodies = [throttled_body(100), throttled_body(200), throttled_body(300)];
        let transport = FakeTransport::new(vec![
            Ok((200, bodies[0].as_str())),
            Ok((200, bodies[1].as_str())),
            Ok((200, bodies[2].as_str())),
            Ok((200, OK_BODY)),
        ]);
        let client = make_client(transport.clone());

        let start = tokio::time::Instant::now();
        let status = client
            .send_message(&channel(), &message("Simple message"))
            .await
            .unwrap();

        // the budget is exhausted before the queued success is ever requested
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(status.status(), DeliveryStatus::Errored);
        assert_eq!(status.attempts().len(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_then_success_within_budget_is_wired() {
        let throttled = throttled_body(150);
        let transport =
            FakeTransport::new(vec![Ok((200, throttled.as_str())), Ok((200, OK_BODY))]);
        let client = make_client(transport.clone());

        let start = tokio::time::Instant::now();
        let status = client
            .send_message(&channel(), &message("Simple message"))
            .await
            .unwrap();

        assert_eq!(status.status(), DeliveryStatus::Wired);
        assert_eq!(status.external_id().unwrap().as_str(), "1002");
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(150));

        let attempts = status.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].provider_status.as_deref(), Some("1"));
        assert_eq!(attempts[1].provider_status.as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let transport = FakeTransport::new(vec![Ok((200, OK_BODY))]);
        let client = make_client(transport.clone());
        let channel = ChannelConfig::new(
            ChannelId::new("8eb23e93-5ecb-45ba-b726-3b064e0c56ab").unwrap(),
            TelAddress::new("+2020").unwrap(),
            "example.com",
        );

        let err = client
            .send_message(&channel, &message("Simple message"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingKey {
                key: CONFIG_API_KEY
            }
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn unparseable_success_body_marks_the_part_failed() {
        let transport = FakeTransport::new(vec![Ok((503, "<html>Service Unavailable</html>"))]);
        let client = make_client(transport.clone());

        let status = client
            .send_message(&channel(), &message("Simple message"))
            .await
            .unwrap();

        assert_eq!(status.status(), DeliveryStatus::Errored);
        let attempts = status.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].http_status, Some(503));
        assert!(attempts[0].provider_status.is_none());
    }

    #[test]
    fn builder_applies_endpoint_overrides() {
        let client = NexmoClient::builder()
            .send_url("https://example.invalid/sms/json")
            .timeout(Duration::from_secs(5))
            .user_agent("gateway/1.0")
            .build()
            .unwrap();
        assert_eq!(client.send_url, "https://example.invalid/sms/json");

        let client = NexmoClient::new();
        assert_eq!(client.send_url, SEND_URL);
    }
}
