use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::error::AppError;
use super::extract::{parse_integer, parse_number, present, JsonBody};
use super::{AppState, MessageResponse};
use crate::db::HotelFilter;
use crate::models::{HotelDraft, HotelSummary, HotelView, MAX_STARS, MIN_STARS};

fn not_found(id: String) -> AppError {
    AppError::NotFound { kind: "hotel", id }
}

/// Query string of `GET /hotels/search/filter`. Values arrive as text so
/// that a bad number is reported as such rather than as a generic
/// extraction failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub destination_id: Option<String>,
    #[serde(alias = "priceMin")]
    pub min_price: Option<String>,
    #[serde(alias = "priceMax")]
    pub max_price: Option<String>,
    #[serde(alias = "starsMin")]
    pub min_stars: Option<String>,
    #[serde(alias = "starsMax")]
    pub max_stars: Option<String>,
    #[serde(alias = "ratingMin")]
    pub min_rating: Option<String>,
}

impl TryFrom<FilterParams> for HotelFilter {
    type Error = AppError;

    fn try_from(params: FilterParams) -> Result<Self, Self::Error> {
        let number = |name: &str, raw: Option<String>| {
            present(raw).map(|s| parse_number(name, &s)).transpose()
        };
        let integer = |name: &str, raw: Option<String>| {
            present(raw).map(|s| parse_integer(name, &s)).transpose()
        };

        Ok(HotelFilter {
            destination_id: present(params.destination_id),
            price_min: number("minPrice", params.min_price)?,
            price_max: number("maxPrice", params.max_price)?,
            stars_min: integer("minStars", params.min_stars)?,
            stars_max: integer("maxStars", params.max_stars)?,
            rating_min: number("minRating", params.min_rating)?,
        })
    }
}

pub async fn list_hotels(State(state): State<AppState>) -> Result<Json<Vec<HotelView>>, AppError> {
    Ok(Json(state.hotels.list().await?))
}

pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HotelView>, AppError> {
    match state.hotels.get_by_id(&id).await? {
        Some(view) => Ok(Json(view)),
        None => Err(not_found(id)),
    }
}

pub async fn hotel_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HotelSummary>, AppError> {
    match state.hotels.get_by_id(&id).await? {
        Some(view) => Ok(Json(view.hotel.summary())),
        None => Err(not_found(id)),
    }
}

pub async fn hotels_by_destination(
    State(state): State<AppState>,
    Path(destination_id): Path<String>,
) -> Result<Json<Vec<HotelView>>, AppError> {
    Ok(Json(state.hotels.find_by_destination(&destination_id).await?))
}

pub async fn create_hotel(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<HotelView>), AppError> {
    let draft = HotelDraft::from_payload(payload)?;
    let view = state.hotels.create(draft).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody,
) -> Result<Json<HotelView>, AppError> {
    Ok(Json(state.hotels.update(&id, patch).await?))
}

pub async fn delete_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.hotels.delete(&id).await?;
    Ok(Json(MessageResponse::new("Hotel deleted successfully")))
}

pub async fn hotels_by_price_range(
    State(state): State<AppState>,
    Path((min, max)): Path<(String, String)>,
) -> Result<Json<Vec<HotelView>>, AppError> {
    let min = parse_number("minPrice", &min)?;
    let max = parse_number("maxPrice", &max)?;
    Ok(Json(state.hotels.find_by_price_range(min, max).await?))
}

pub async fn hotels_by_stars(
    State(state): State<AppState>,
    Path(stars): Path<String>,
) -> Result<Json<Vec<HotelView>>, AppError> {
    let stars = parse_integer("stars", &stars)?;
    if !(MIN_STARS..=MAX_STARS).contains(&stars) {
        return Err(AppError::BadRequest(format!(
            "stars must be between {MIN_STARS} and {MAX_STARS}, got {stars}"
        )));
    }
    Ok(Json(state.hotels.find_by_stars(stars).await?))
}

pub async fn filter_hotels(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Vec<HotelView>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let filter = HotelFilter::try_from(params)?;
    Ok(Json(state.hotels.filter(&filter).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_give_empty_filter() {
        let filter = HotelFilter::try_from(FilterParams::default()).unwrap();
        assert_eq!(filter, HotelFilter::default());
    }

    #[test]
    fn test_params_are_parsed() {
        let params = FilterParams {
            destination_id: Some("d1".into()),
            min_price: Some("100".into()),
            max_price: Some("".into()),
            min_stars: Some("3".into()),
            max_stars: None,
            min_rating: Some("4.5".into()),
        };

        let filter = HotelFilter::try_from(params).unwrap();
        assert_eq!(filter.destination_id.as_deref(), Some("d1"));
        assert_eq!(filter.price_min, Some(100.0));
        assert_eq!(filter.price_max, None);
        assert_eq!(filter.stars_min, Some(3));
        assert_eq!(filter.rating_min, Some(4.5));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let params = FilterParams {
            min_price: Some("cheap".into()),
            ..Default::default()
        };
        let err = HotelFilter::try_from(params).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("minPrice")));
    }
}
