//! AbuseReport, UserBan and IpBan entity <-> model mapper

use snapboard_core::entities::{AbuseReport, IpBan, UserBan};
use snapboard_core::error::DomainError;
use snapboard_core::value_objects::Snowflake;

use crate::models::{AbuseReportModel, IpBanModel, UserBanModel};

impl From<AbuseReportModel> for AbuseReport {
    fn from(model: AbuseReportModel) -> Self {
        AbuseReport {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            submitter_id: Snowflake::new(model.submitter_id),
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}

impl From<UserBanModel> for UserBan {
    fn from(model: UserBanModel) -> Self {
        UserBan {
            user_id: Snowflake::new(model.user_id),
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}

impl TryFrom<IpBanModel> for IpBan {
    type Error = DomainError;

    fn try_from(model: IpBanModel) -> Result<Self, Self::Error> {
        let address = model.address.parse().map_err(|_| {
            DomainError::DatabaseError(format!("invalid banned address {:?}", model.address))
        })?;
        Ok(IpBan {
            address,
            reason: model.reason,
            created_at: model.created_at,
        })
    }
}
