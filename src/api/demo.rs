use axum::{Json, extract::Query};
use rand::Rng;

use super::{RandDataQuery, RandDataResponse};

/// `GET /api/v0/hello`
pub async fn hello() -> Json<&'static str> {
    Json("API says hello")
}

/// `GET /rand`
pub async fn rand_number() -> String {
    rand::rng().random_range(0..=100_i64).to_string()
}

/// `GET /randData?params=<int>`
pub async fn rand_data(Query(query): Query<RandDataQuery>) -> Json<RandDataResponse> {
    let random_number = rand::rng().random_range(0..=100_i64);

    Json(RandDataResponse {
        random_number,
        params: query.params,
        sum_random_params: random_number.saturating_add(query.params),
    })
}
