//! Outbound email delivery.

use serde::Serialize;

use mailroom_common::{AppError, AppResult, MailConfig, MailProviderConfig};

/// A single email ready for delivery.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Result of one delivery attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    /// Whether the provider accepted the email.
    pub success: bool,
    /// Message ID from the provider, if available.
    pub message_id: Option<String>,
    /// Error message on failure.
    pub error: Option<String>,
}

/// Email delivery over the configured provider.
#[derive(Clone)]
pub struct EmailDelivery {
    config: MailConfig,
    http_client: reqwest::Client,
}

impl EmailDelivery {
    /// Create a new delivery component.
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Whether outbound mail is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Deliver one email through the configured provider.
    pub async fn send(&self, email: OutboundEmail) -> AppResult<DeliveryOutcome> {
        if !self.config.enabled {
            return Err(AppError::BadRequest(
                "Outbound mail is disabled".to_string(),
            ));
        }

        match &self.config.provider {
            MailProviderConfig::Smtp { host, port, .. } => self.send_smtp(host, *port, &email),
            MailProviderConfig::Sendgrid { api_key } => self.send_sendgrid(api_key, email).await,
            MailProviderConfig::Mailgun {
                api_key,
                domain,
                eu_region,
            } => self.send_mailgun(api_key, domain, *eu_region, email).await,
        }
    }

    fn send_smtp(&self, host: &str, port: u16, email: &OutboundEmail) -> AppResult<DeliveryOutcome> {
        // SMTP transport is a logged placeholder; HTTP providers do real delivery.
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            host = %host,
            port = port,
            "Would send email via SMTP (implementation pending)"
        );
        Ok(DeliveryOutcome {
            success: true,
            message_id: Some(format!("smtp-{}", uuid::Uuid::new_v4())),
            error: None,
        })
    }

    async fn send_sendgrid(
        &self,
        api_key: &str,
        email: OutboundEmail,
    ) -> AppResult<DeliveryOutcome> {
        let body = serde_json::json!({
            "personalizations": [{
                "to": [{"email": email.to}]
            }],
            "from": {
                "email": self.config.from_address,
                "name": self.config.from_name
            },
            "subject": email.subject,
            "content": [
                {"type": "text/html", "value": email.html_body}
            ]
        });

        let response = self
            .http_client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("SendGrid request failed: {e}")))?;

        if response.status().is_success() {
            let message_id = response
                .headers()
                .get("X-Message-Id")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            Ok(DeliveryOutcome {
                success: true,
                message_id,
                error: None,
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Ok(DeliveryOutcome {
                success: false,
                message_id: None,
                error: Some(error_text),
            })
        }
    }

    async fn send_mailgun(
        &self,
        api_key: &str,
        domain: &str,
        eu_region: bool,
        email: OutboundEmail,
    ) -> AppResult<DeliveryOutcome> {
        let base_url = if eu_region {
            "https://api.eu.mailgun.net"
        } else {
            "https://api.mailgun.net"
        };

        let form_params = vec![
            (
                "from",
                format!("{} <{}>", self.config.from_name, self.config.from_address),
            ),
            ("to", email.to),
            ("subject", email.subject),
            ("html", email.html_body),
        ];

        let response = self
            .http_client
            .post(format!("{base_url}/v3/{domain}/messages"))
            .basic_auth("api", Some(api_key))
            .form(&form_params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Mailgun request failed: {e}")))?;

        if response.status().is_success() {
            #[derive(serde::Deserialize)]
            struct MailgunResponse {
                id: Option<String>,
            }
            let result = response
                .json::<MailgunResponse>()
                .await
                .unwrap_or(MailgunResponse { id: None });
            Ok(DeliveryOutcome {
                success: true,
                message_id: result.id,
                error: None,
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Ok(DeliveryOutcome {
                success: false,
                message_id: None,
                error: Some(error_text),
            })
        }
    }
}
