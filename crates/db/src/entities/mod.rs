//! Database entities.

#![allow(missing_docs)]

pub mod follower;
pub mod follower_subtype;
pub mod mail;
pub mod message;
pub mod message_subtype;
pub mod notification;
pub mod partner;
pub mod user;

pub use follower::Entity as Follower;
pub use follower_subtype::Entity as FollowerSubtype;
pub use mail::Entity as Mail;
pub use message::Entity as Message;
pub use message_subtype::Entity as MessageSubtype;
pub use notification::Entity as Notification;
pub use partner::Entity as Partner;
pub use user::Entity as User;
