//! Database repositories.

#![allow(missing_docs)]

pub mod follower;
pub mod mail;
pub mod message;
pub mod notification;
pub mod partner;
pub mod subtype;
pub mod user;

pub use follower::FollowerRepository;
pub use mail::MailRepository;
pub use message::MessageRepository;
pub use notification::{NotificationRepository, new_notification};
pub use partner::PartnerRepository;
pub use subtype::SubtypeRepository;
pub use user::UserRepository;
