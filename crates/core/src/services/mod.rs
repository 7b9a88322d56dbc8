//! Business logic services.

#![allow(missing_docs)]

pub mod access;
pub mod email;
pub mod follower;
pub mod mailer;
pub mod notification;

pub use access::{AccessDecision, AllowAll, MessageAccess};
pub use email::{DeliveryOutcome, EmailDelivery, OutboundEmail};
pub use follower::FollowerService;
pub use mailer::{MailerService, NewMail};
pub use notification::NotificationService;
