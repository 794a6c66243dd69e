//! # snapboard-service
//!
//! Application layer: the revision store, rendering, moderation, and topic
//! watch use cases, plus the DTOs the view layer consumes.

pub mod dto;
pub mod services;

pub use services::{
    BanCache, ModerationService, PermissionService, RenderService, RevisionService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, ServiceSettings,
    WatchService,
};
