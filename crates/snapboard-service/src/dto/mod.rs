//! Data transfer objects
//!
//! This module provides:
//! - Request DTOs with validation for inputs from the view layer
//! - Response DTOs for serializing outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AbuseReportRequest, AppendRevisionRequest, BanRequest, CreatePostRequest, CreateTopicRequest,
    HistoryPageRequest, PreviewRequest, RetractRevisionRequest,
};

pub use responses::{
    AbuseReportResponse, PaginatedResponse, PaginationMeta, PostResponse, PostView,
    RenderedResponse, RevisionResponse, TopicResponse, WatchResponse,
};
