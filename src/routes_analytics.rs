// --------------------------------------------------
// GET /api/analytics
// Returns the persisted summary. The summary is recomputed at
// every mutation point, so reads never aggregate on the fly.
// -------------------------------------------------

use axum::Json;

use crate::error::PlanError;
use crate::models::AnalyticsSummary;
use crate::store;

pub async fn get_analytics() -> Result<Json<AnalyticsSummary>, PlanError> {
    let db = store::load_db()?;
    Ok(Json(db.analytics))
}
