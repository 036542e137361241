//! Engagement collaborator contract.
//!
//! The session engine never talks to the data store directly. Likes, replies
//! and the initial story groups all go through [`EngagementGateway`].

mod gateway;

pub use gateway::{EngagementGateway, GatewayError, GatewayResult, LikeEntry, MessageId};
