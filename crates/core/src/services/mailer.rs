//! Outbound mail service.

use crate::generate_id;
use crate::services::email::{EmailDelivery, OutboundEmail};
use mailroom_common::AppResult;
use mailroom_db::{
    entities::mail::{self, MailState},
    repositories::{MailRepository, MessageRepository, PartnerRepository},
};
use sea_orm::Set;

/// Input for creating an outbound mail row.
#[derive(Debug, Clone)]
pub struct NewMail {
    /// The message this mail notifies about, if any.
    pub message_id: Option<String>,
    /// Direct recipient list. Notification mails pass an empty string and
    /// supply recipients out-of-band to [`MailerService::send`].
    pub email_to: String,
    /// HTML body.
    pub body_html: String,
    /// Delete the row after a successful send.
    pub auto_delete: bool,
}

/// Mail-transport service: persists outbound mail rows and hands them to the
/// delivery provider.
#[derive(Clone)]
pub struct MailerService {
    mail_repo: MailRepository,
    message_repo: MessageRepository,
    partner_repo: PartnerRepository,
    delivery: EmailDelivery,
}

impl MailerService {
    /// Create a new mailer service.
    #[must_use]
    pub const fn new(
        mail_repo: MailRepository,
        message_repo: MessageRepository,
        partner_repo: PartnerRepository,
        delivery: EmailDelivery,
    ) -> Self {
        Self {
            mail_repo,
            message_repo,
            partner_repo,
            delivery,
        }
    }

    /// Persist an outbound mail row in `outgoing` state and return its id.
    pub async fn create(&self, new_mail: NewMail) -> AppResult<String> {
        let id = generate_id();
        let model = mail::ActiveModel {
            id: Set(id.clone()),
            message_id: Set(new_mail.message_id),
            email_to: Set(new_mail.email_to),
            body_html: Set(new_mail.body_html),
            state: Set(MailState::Outgoing),
            auto_delete: Set(new_mail.auto_delete),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.mail_repo.create(model).await?;
        Ok(id)
    }

    /// Send a persisted mail to the given partners.
    ///
    /// Recipients come from `recipient_ids`, not from the row's `email_to`
    /// field. Partners without an email address are skipped. The row moves to
    /// `sent` once at least one delivery succeeds, otherwise to `exception`;
    /// rows flagged `auto_delete` are removed after a successful send.
    pub async fn send(&self, mail_id: &str, recipient_ids: &[String]) -> AppResult<bool> {
        let mail = self.mail_repo.get_by_id(mail_id).await?;
        let subject = self.resolve_subject(&mail).await?;

        let partners = self.partner_repo.find_by_ids(recipient_ids).await?;

        let mut delivered = 0_usize;
        for partner in &partners {
            let Some(address) = partner.email.as_deref().filter(|a| !a.is_empty()) else {
                tracing::debug!(partner_id = %partner.id, "Skipping recipient without email address");
                continue;
            };

            let email = OutboundEmail {
                to: address.to_string(),
                subject: subject.clone(),
                html_body: mail.body_html.clone(),
            };

            match self.delivery.send(email).await {
                Ok(outcome) if outcome.success => delivered += 1,
                Ok(outcome) => {
                    tracing::warn!(
                        mail_id = %mail_id,
                        to = %address,
                        error = ?outcome.error,
                        "Email delivery rejected by provider"
                    );
                }
                Err(e) => {
                    tracing::warn!(mail_id = %mail_id, to = %address, error = %e, "Email delivery failed");
                }
            }
        }

        if delivered == 0 {
            self.mail_repo
                .set_state(mail_id, MailState::Exception)
                .await?;
            return Ok(false);
        }

        self.mail_repo.set_state(mail_id, MailState::Sent).await?;
        if mail.auto_delete {
            self.mail_repo.delete(mail_id).await?;
        }
        Ok(true)
    }

    /// Cancel a queued mail.
    pub async fn cancel(&self, mail_id: &str) -> AppResult<()> {
        self.mail_repo
            .set_state(mail_id, MailState::Cancelled)
            .await
    }

    async fn resolve_subject(&self, mail: &mail::Model) -> AppResult<String> {
        if let Some(message_id) = &mail.message_id {
            let message = self.message_repo.get_by_id(message_id).await?;
            if let Some(subject) = message.subject.filter(|s| !s.is_empty()) {
                return Ok(subject);
            }
        }
        Ok("Notification".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mailroom_common::MailConfig;
    use mailroom_db::entities::partner::{self, EmailPreference};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_mail(id: &str, state: MailState, auto_delete: bool) -> mail::Model {
        mail::Model {
            id: id.to_string(),
            message_id: None,
            email_to: String::new(),
            body_html: "<p>body</p>".to_string(),
            state,
            auto_delete,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_partner(id: &str, email: Option<&str>) -> partner::Model {
        partner::Model {
            id: id.to_string(),
            name: format!("Partner {id}"),
            email: email.map(String::from),
            notify_email: EmailPreference::All,
            created_at: Utc::now().into(),
        }
    }

    fn enabled_delivery() -> EmailDelivery {
        EmailDelivery::new(MailConfig {
            enabled: true,
            ..MailConfig::default()
        })
    }

    fn exec_ok(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    #[tokio::test]
    async fn test_create_returns_generated_id() {
        let stored = create_test_mail("mail1", MailState::Outgoing, true);

        let mail_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_exec_results([exec_ok(1)])
                .into_connection(),
        );
        let message_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let partner_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = MailerService::new(
            MailRepository::new(mail_db),
            MessageRepository::new(message_db),
            PartnerRepository::new(partner_db),
            enabled_delivery(),
        );

        let id = service
            .create(NewMail {
                message_id: None,
                email_to: String::new(),
                body_html: "<p>body</p>".to_string(),
                auto_delete: true,
            })
            .await
            .unwrap();

        assert_eq!(id.len(), 26);
    }

    #[tokio::test]
    async fn test_send_delivers_and_auto_deletes() {
        let mail = create_test_mail("mail1", MailState::Outgoing, true);
        let sent = create_test_mail("mail1", MailState::Sent, true);

        let mail_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // get_by_id, set_state fetch + returning, delete fetch
                .append_query_results([
                    vec![mail.clone()],
                    vec![mail.clone()],
                    vec![sent.clone()],
                    vec![sent],
                ])
                .append_exec_results([exec_ok(1), exec_ok(1)])
                .into_connection(),
        );
        let message_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let partner_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_partner("p1", Some("p1@example.com"))]])
                .into_connection(),
        );

        let service = MailerService::new(
            MailRepository::new(mail_db),
            MessageRepository::new(message_db),
            PartnerRepository::new(partner_db),
            enabled_delivery(),
        );

        let ok = service.send("mail1", &["p1".to_string()]).await.unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn test_send_without_deliverable_recipients_marks_exception() {
        let mail = create_test_mail("mail1", MailState::Outgoing, true);
        let failed = create_test_mail("mail1", MailState::Exception, true);

        let mail_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![mail.clone()], vec![mail], vec![failed]])
                .append_exec_results([exec_ok(1)])
                .into_connection(),
        );
        let message_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let partner_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_partner("p1", None)]])
                .into_connection(),
        );

        let service = MailerService::new(
            MailRepository::new(mail_db),
            MessageRepository::new(message_db),
            PartnerRepository::new(partner_db),
            enabled_delivery(),
        );

        let ok = service.send("mail1", &["p1".to_string()]).await.unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_cancel_marks_mail_cancelled() {
        let mail = create_test_mail("mail1", MailState::Outgoing, false);
        let cancelled = create_test_mail("mail1", MailState::Cancelled, false);

        let mail_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![mail], vec![cancelled]])
                .append_exec_results([exec_ok(1)])
                .into_connection(),
        );
        let message_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let partner_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = MailerService::new(
            MailRepository::new(mail_db),
            MessageRepository::new(message_db),
            PartnerRepository::new(partner_db),
            enabled_delivery(),
        );

        assert!(service.cancel("mail1").await.is_ok());
    }
}
