//! Notification fan-out and read-state reconciliation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::generate_id;
use crate::services::access::{AllowAll, MessageAccess};
use crate::services::mailer::{MailerService, NewMail};
use mailroom_common::{AppResult, append_content_to_html};
use mailroom_db::{
    entities::{
        message::{self, MessageType},
        notification,
        partner::EmailPreference,
    },
    repositories::{
        MessageRepository, NotificationRepository, PartnerRepository, UserRepository,
        new_notification,
    },
};

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    partner_repo: PartnerRepository,
    user_repo: UserRepository,
    message_repo: MessageRepository,
    mailer: MailerService,
    access: Arc<dyn MessageAccess>,
}

impl NotificationService {
    /// Create a new notification service. The access guard defaults to
    /// granting every principal; see [`NotificationService::set_access`].
    #[must_use]
    pub fn new(
        notification_repo: NotificationRepository,
        partner_repo: PartnerRepository,
        user_repo: UserRepository,
        message_repo: MessageRepository,
        mailer: MailerService,
    ) -> Self {
        Self {
            notification_repo,
            partner_repo,
            user_repo,
            message_repo,
            mailer,
            access: Arc::new(AllowAll),
        }
    }

    /// Set the access guard consulted before notification writes.
    pub fn set_access(&mut self, access: Arc<dyn MessageAccess>) {
        self.access = access;
    }

    /// Create a notification row for a partner on a message.
    ///
    /// When the guard denies the principal read access to messages, no row is
    /// written and `Ok(None)` is returned rather than an error. Callers must
    /// check the returned option.
    pub async fn create_notification(
        &self,
        principal_user_id: &str,
        partner_id: &str,
        message_id: &str,
        read: bool,
    ) -> AppResult<Option<notification::Model>> {
        if !self.access.check_read(principal_user_id).is_granted() {
            tracing::debug!(
                principal = %principal_user_id,
                partner_id = %partner_id,
                message_id = %message_id,
                "Notification creation denied by access guard"
            );
            return Ok(None);
        }

        let model = new_notification(generate_id(), partner_id, message_id, read);
        let created = self.notification_repo.create(model).await?;
        Ok(Some(created))
    }

    /// Mark the principal's notifications for the given messages read or
    /// unread, creating missing rows on the fly.
    ///
    /// Messages that already carry a notification row for the principal's
    /// partner are bulk-updated. Messages without one (the partner was pulled
    /// into the conversation without an explicit follow) get a fresh row
    /// carrying the desired flag before the update pass runs; re-updating a
    /// just-created row is tolerated. Returns the number of rows touched.
    pub async fn set_message_read(
        &self,
        principal_user_id: &str,
        message_ids: &[String],
        read: bool,
    ) -> AppResult<u64> {
        if message_ids.is_empty() {
            return Ok(0);
        }

        let principal = self.user_repo.get_by_id(principal_user_id).await?;

        let existing = self
            .notification_repo
            .find_by_partner_and_messages(&principal.partner_id, message_ids)
            .await?;

        let mut covered: HashSet<&str> = existing.iter().map(|n| n.message_id.as_str()).collect();

        // Set difference: one row per distinct missing message id, even when
        // the input repeats an id.
        let mut touched = 0_u64;
        for message_id in message_ids {
            if !covered.insert(message_id.as_str()) {
                continue;
            }
            let created = self
                .create_notification(principal_user_id, &principal.partner_id, message_id, read)
                .await?;
            if created.is_some() {
                touched += 1;
            }
        }

        let matched_ids: Vec<String> = existing.into_iter().map(|n| n.id).collect();
        touched += self.notification_repo.set_read_many(&matched_ids, read).await?;

        Ok(touched)
    }

    /// Compute the ordered partner list to email about a message.
    ///
    /// Walks the message's notification rows in insertion order and applies
    /// the exclusion rules in precedence order; the first match drops the
    /// partner:
    /// 1. notification already read
    /// 2. the partner's primary user is the acting principal
    /// 3. the partner has no email address
    /// 4. preference `none`
    /// 5. preference `comment` and the message is neither an email nor a comment
    /// 6. preference `email` and the message is not an email
    pub async fn get_partners_to_notify(
        &self,
        principal_user_id: &str,
        message: &message::Model,
    ) -> AppResult<Vec<String>> {
        let notifications = self.notification_repo.find_by_message(&message.id).await?;
        if notifications.is_empty() {
            return Ok(Vec::new());
        }

        let mut partner_ids: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for n in &notifications {
            if seen.insert(n.partner_id.clone()) {
                partner_ids.push(n.partner_id.clone());
            }
        }

        let partners: HashMap<String, _> = self
            .partner_repo
            .find_by_ids(&partner_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let mut notify = Vec::new();
        for n in &notifications {
            if n.read {
                continue;
            }
            let Some(partner) = partners.get(&n.partner_id) else {
                continue;
            };
            if let Some(primary) = self.user_repo.find_primary_by_partner(&partner.id).await? {
                if primary.id == principal_user_id {
                    continue;
                }
            }
            if partner.email.as_deref().is_none_or(str::is_empty) {
                continue;
            }
            match &partner.notify_email {
                EmailPreference::None => continue,
                EmailPreference::Comment
                    if !matches!(
                        message.message_type,
                        MessageType::Email | MessageType::Comment
                    ) =>
                {
                    continue;
                }
                EmailPreference::Email if message.message_type != MessageType::Email => {
                    continue;
                }
                _ => {}
            }
            notify.push(partner.id.clone());
        }

        Ok(notify)
    }

    /// Create and send the outbound email for a message.
    ///
    /// `suppress_email` short-circuits the whole dispatch and reports
    /// success, as does an empty notify-list. The outbound mail row keeps an
    /// empty `email_to`; the notify-list travels out-of-band as the
    /// recipient id list handed to [`MailerService::send`].
    pub async fn notify(
        &self,
        principal_user_id: &str,
        message_id: &str,
        suppress_email: bool,
    ) -> AppResult<bool> {
        if suppress_email {
            return Ok(true);
        }

        let message = self.message_repo.get_by_id(message_id).await?;
        let recipients = self
            .get_partners_to_notify(principal_user_id, &message)
            .await?;
        if recipients.is_empty() {
            return Ok(true);
        }

        let mut body = message.body.clone();
        if let Some(author_id) = &message.author_id {
            if let Some(author) = self.user_repo.find_primary_by_partner(author_id).await? {
                if let Some(signature) = author.signature.filter(|s| !s.is_empty()) {
                    body = append_content_to_html(&body, &signature, true, Some("div"));
                }
            }
        }

        let mail_id = self
            .mailer
            .create(NewMail {
                message_id: Some(message.id.clone()),
                email_to: String::new(),
                body_html: body,
                auto_delete: true,
            })
            .await?;

        tracing::debug!(
            message_id = %message_id,
            mail_id = %mail_id,
            recipients = recipients.len(),
            "Dispatching notification email"
        );

        self.mailer.send(&mail_id, &recipients).await
    }

    /// Mark every unread notification of the principal's partner as read.
    pub async fn mark_all_read(&self, principal_user_id: &str) -> AppResult<u64> {
        let principal = self.user_repo.get_by_id(principal_user_id).await?;
        self.notification_repo
            .set_all_read(&principal.partner_id)
            .await
    }

    /// Count unread notifications of the principal's partner.
    pub async fn count_unread(&self, principal_user_id: &str) -> AppResult<u64> {
        let principal = self.user_repo.get_by_id(principal_user_id).await?;
        self.notification_repo
            .count_unread(&principal.partner_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::access::AccessDecision;
    use crate::services::email::EmailDelivery;
    use chrono::Utc;
    use mailroom_common::MailConfig;
    use mailroom_db::entities::{partner, user};
    use mailroom_db::repositories::MailRepository;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    struct DenyAll;

    impl MessageAccess for DenyAll {
        fn check_read(&self, _principal_user_id: &str) -> AccessDecision {
            AccessDecision::Denied
        }
    }

    fn create_test_user(id: &str, partner_id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            login: format!("login-{id}"),
            partner_id: partner_id.to_string(),
            signature: None,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_partner(
        id: &str,
        email: Option<&str>,
        notify_email: EmailPreference,
    ) -> partner::Model {
        partner::Model {
            id: id.to_string(),
            name: format!("Partner {id}"),
            email: email.map(String::from),
            notify_email,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_notification(
        id: &str,
        partner_id: &str,
        message_id: &str,
        read: bool,
    ) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            partner_id: partner_id.to_string(),
            message_id: message_id.to_string(),
            read,
        }
    }

    fn create_test_message(id: &str, message_type: MessageType) -> message::Model {
        message::Model {
            id: id.to_string(),
            message_type,
            subject: Some("Subject".to_string()),
            body: "<p>body</p>".to_string(),
            author_id: None,
            res_model: Some("crm.lead".to_string()),
            res_id: Some(7),
            created_at: Utc::now().into(),
        }
    }

    fn empty_conn() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn exec_ok(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    fn disabled_mailer() -> MailerService {
        MailerService::new(
            MailRepository::new(empty_conn()),
            MessageRepository::new(empty_conn()),
            PartnerRepository::new(empty_conn()),
            EmailDelivery::new(MailConfig::default()),
        )
    }

    fn service(
        notification_db: Arc<DatabaseConnection>,
        partner_db: Arc<DatabaseConnection>,
        user_db: Arc<DatabaseConnection>,
        message_db: Arc<DatabaseConnection>,
    ) -> NotificationService {
        NotificationService::new(
            NotificationRepository::new(notification_db),
            PartnerRepository::new(partner_db),
            UserRepository::new(user_db),
            MessageRepository::new(message_db),
            disabled_mailer(),
        )
    }

    #[tokio::test]
    async fn test_create_notification_denied_persists_nothing() {
        // No expectations on any connection: a single query would fail the test.
        let mut service = service(empty_conn(), empty_conn(), empty_conn(), empty_conn());
        service.set_access(Arc::new(DenyAll));

        let created = service
            .create_notification("u1", "p1", "m1", false)
            .await
            .unwrap();
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn test_create_notification_granted() {
        let stored = create_test_notification("n1", "p1", "m1", false);
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_exec_results([exec_ok(1)])
                .into_connection(),
        );

        let service = service(notification_db, empty_conn(), empty_conn(), empty_conn());
        let created = service
            .create_notification("u1", "p1", "m1", false)
            .await
            .unwrap();
        assert!(created.is_some());
    }

    #[tokio::test]
    async fn test_set_message_read_full_coverage_only_updates() {
        let message_ids = vec!["m1".to_string(), "m2".to_string()];

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_notification("n1", "p1", "m1", false),
                    create_test_notification("n2", "p1", "m2", false),
                ]])
                // a create would consume a second query result and fail
                .append_exec_results([exec_ok(2)])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1", "p1")]])
                .into_connection(),
        );

        let service = service(notification_db, empty_conn(), user_db, empty_conn());
        let touched = service
            .set_message_read("u1", &message_ids, true)
            .await
            .unwrap();
        assert_eq!(touched, 2);
    }

    #[tokio::test]
    async fn test_set_message_read_zero_coverage_only_creates() {
        let message_ids = vec!["m1".to_string(), "m2".to_string()];

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    Vec::<notification::Model>::new(),
                    vec![create_test_notification("n1", "p1", "m1", true)],
                    vec![create_test_notification("n2", "p1", "m2", true)],
                ])
                .append_exec_results([exec_ok(1), exec_ok(1)])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1", "p1")]])
                .into_connection(),
        );

        let service = service(notification_db, empty_conn(), user_db, empty_conn());
        let touched = service
            .set_message_read("u1", &message_ids, true)
            .await
            .unwrap();
        // two creates, update pass over zero matched rows is skipped
        assert_eq!(touched, 2);
    }

    #[tokio::test]
    async fn test_set_message_read_mixed_creates_then_updates() {
        let message_ids = vec!["m1".to_string(), "m2".to_string()];

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![create_test_notification("n1", "p1", "m1", false)],
                    vec![create_test_notification("n2", "p1", "m2", true)],
                ])
                .append_exec_results([exec_ok(1), exec_ok(1)])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1", "p1")]])
                .into_connection(),
        );

        let service = service(notification_db, empty_conn(), user_db, empty_conn());
        let touched = service
            .set_message_read("u1", &message_ids, true)
            .await
            .unwrap();
        assert_eq!(touched, 2);
    }

    #[tokio::test]
    async fn test_set_message_read_duplicate_ids_create_once() {
        let message_ids = vec!["m1".to_string(), "m1".to_string()];

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // a second insert would consume a query result that is not
                // there and fail the test
                .append_query_results([
                    Vec::<notification::Model>::new(),
                    vec![create_test_notification("n1", "p1", "m1", true)],
                ])
                .append_exec_results([exec_ok(1)])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1", "p1")]])
                .into_connection(),
        );

        let service = service(notification_db, empty_conn(), user_db, empty_conn());
        let touched = service
            .set_message_read("u1", &message_ids, true)
            .await
            .unwrap();
        assert_eq!(touched, 1);
    }

    #[tokio::test]
    async fn test_set_message_read_empty_is_noop() {
        let service = service(empty_conn(), empty_conn(), empty_conn(), empty_conn());
        let touched = service.set_message_read("u1", &[], true).await.unwrap();
        assert_eq!(touched, 0);
    }

    #[tokio::test]
    async fn test_get_partners_to_notify_applies_exclusions_in_order() {
        let message = create_test_message("m1", MessageType::Comment);

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_notification("n1", "p1", "m1", true),
                    create_test_notification("n2", "p2", "m1", false),
                    create_test_notification("n3", "p3", "m1", false),
                    create_test_notification("n4", "p4", "m1", false),
                ]])
                .into_connection(),
        );
        let partner_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_partner("p1", Some("p1@example.com"), EmailPreference::All),
                    create_test_partner("p2", Some("p2@example.com"), EmailPreference::All),
                    create_test_partner("p3", Some("p3@example.com"), EmailPreference::None),
                    create_test_partner("p4", Some("p4@example.com"), EmailPreference::All),
                ]])
                .into_connection(),
        );
        // primary-user lookups for p2 (the principal), p3, p4
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![create_test_user("u1", "p2")],
                    Vec::<user::Model>::new(),
                    Vec::<user::Model>::new(),
                ])
                .into_connection(),
        );

        let service = service(notification_db, partner_db, user_db, empty_conn());
        let notify = service
            .get_partners_to_notify("u1", &message)
            .await
            .unwrap();
        assert_eq!(notify, vec!["p4".to_string()]);
    }

    #[tokio::test]
    async fn test_get_partners_to_notify_preference_email_skips_comments() {
        let message = create_test_message("m1", MessageType::Comment);

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_notification("n1", "p1", "m1", false),
                    create_test_notification("n2", "p2", "m1", false),
                ]])
                .into_connection(),
        );
        let partner_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_partner("p1", Some("p1@example.com"), EmailPreference::Email),
                    create_test_partner("p2", Some("p2@example.com"), EmailPreference::Comment),
                ]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new(), Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = service(notification_db, partner_db, user_db, empty_conn());
        let notify = service
            .get_partners_to_notify("u1", &message)
            .await
            .unwrap();
        // comment messages reach `comment` subscribers but not `email`-only ones
        assert_eq!(notify, vec!["p2".to_string()]);
    }

    #[tokio::test]
    async fn test_get_partners_to_notify_skips_missing_email() {
        let message = create_test_message("m1", MessageType::Email);

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_notification("n1", "p1", "m1", false)]])
                .into_connection(),
        );
        let partner_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_partner("p1", None, EmailPreference::All)]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = service(notification_db, partner_db, user_db, empty_conn());
        let notify = service
            .get_partners_to_notify("u1", &message)
            .await
            .unwrap();
        assert!(notify.is_empty());
    }

    #[tokio::test]
    async fn test_notify_suppressed_is_noop() {
        let service = service(empty_conn(), empty_conn(), empty_conn(), empty_conn());
        let ok = service.notify("u1", "m1", true).await.unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn test_notify_empty_list_creates_no_mail() {
        let message = create_test_message("m1", MessageType::Comment);

        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // the only notification is already read
                .append_query_results([[create_test_notification("n1", "p1", "m1", true)]])
                .into_connection(),
        );
        let partner_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_partner(
                    "p1",
                    Some("p1@example.com"),
                    EmailPreference::All,
                )]])
                .into_connection(),
        );
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[message]])
                .into_connection(),
        );

        // the mailer holds connections with no expectations: creating a mail
        // row would fail the test
        let service = service(notification_db, partner_db, empty_conn(), message_db);
        let ok = service.notify("u1", "m1", false).await.unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_ok(3)])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1", "p1")]])
                .into_connection(),
        );

        let service = service(notification_db, empty_conn(), user_db, empty_conn());
        let updated = service.mark_all_read("u1").await.unwrap();
        assert_eq!(updated, 3);
    }
}
