//! Repository ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    AbuseReportRepository, BanRepository, BoardRepository, HistoryQuery, PostQuery,
    PostRepository, RepoResult, RevisionRepository, WatchRepository,
};
