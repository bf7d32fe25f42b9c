use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use soulcard::{DailyFortuneRequest, EarthlyBranch};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

fn parse_branch(raw: &str) -> Result<EarthlyBranch, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyFortuneBody {
    pub name: String,
    #[schema(value_type = String, format = Date, example = "1995-06-15")]
    pub birth_date: NaiveDate,
    /// Earthly branch of the birth hour: `午`, `午时` or `wu`
    #[schema(example = "午")]
    pub birth_time: String,
    /// Defaults to today's local date
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub target_date: Option<NaiveDate>,
}

impl DailyFortuneBody {
    pub fn into_request(self) -> Result<DailyFortuneRequest, ApiError> {
        Ok(DailyFortuneRequest {
            birth_time: parse_branch(&self.birth_time)?,
            name: self.name,
            birth_date: self.birth_date,
            target_date: self.target_date,
        })
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    #[param(value_type = String, format = Date, example = "1995-06-15")]
    pub birth_date: NaiveDate,
    #[param(example = "午")]
    pub birth_time: String,
}

impl CalendarQuery {
    pub fn branch(&self) -> Result<EarthlyBranch, ApiError> {
        parse_branch(&self.birth_time)
    }
}
