//! Account profile, address book, and address autofill.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use mirakle_core::AddressId;

use crate::db::{AddressRepository, UserRepository};
use crate::db::addresses::AddressInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::address::Address;
use crate::models::user::User;
use crate::services::geocode::ResolvedAddress;
use crate::state::AppState;

/// Request body for creating or updating an address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBody {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl AddressBody {
    fn into_input(self) -> Result<AddressInput> {
        for (field, value) in [
            ("fullName", &self.full_name),
            ("phone", &self.phone),
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("postalCode", &self.postal_code),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }

        Ok(AddressInput {
            full_name: self.full_name,
            phone: self.phone,
            line1: self.line1,
            line2: self.line2.filter(|l| !l.trim().is_empty()),
            city: self.city,
            state: self.state,
            country: self.country,
            postal_code: self.postal_code,
        })
    }
}

/// Query parameters for address autofill.
#[derive(Debug, Deserialize)]
pub struct LocateQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Get the current user's profile.
///
/// `GET /account`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<User>> {
    let profile = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account not found".to_string()))?;

    Ok(Json(profile))
}

/// List the current user's addresses.
///
/// `GET /account/addresses`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_addresses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(addresses))
}

/// Add an address to the current user's address book.
///
/// `POST /account/addresses`
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddressBody>,
) -> Result<Json<Address>> {
    let input = body.into_input()?;
    let address = AddressRepository::new(state.pool())
        .create(user.id, &input)
        .await?;

    Ok(Json(address))
}

/// Replace an address's fields.
///
/// `PUT /account/addresses/{id}`
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
    Json(body): Json<AddressBody>,
) -> Result<Json<Address>> {
    let input = body.into_input()?;
    let address = AddressRepository::new(state.pool())
        .update(user.id, id, &input)
        .await?;

    Ok(Json(address))
}

/// Remove an address from the address book.
///
/// `DELETE /account/addresses/{id}`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<Value>> {
    let deleted = AddressRepository::new(state.pool())
        .delete(user.id, id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("address {id} not found")));
    }

    Ok(Json(json!({ "message": "Address deleted" })))
}

/// Resolve coordinates to address fields for form autofill.
///
/// `GET /account/locate?lat=&lon=`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn locate(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<LocateQuery>,
) -> Result<Json<ResolvedAddress>> {
    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lon) {
        return Err(AppError::Validation("coordinates out of range".to_string()));
    }

    let geocoder = state.geocoder().ok_or_else(|| {
        AppError::Validation("address autofill is not available".to_string())
    })?;

    let resolved = geocoder.reverse(query.lat, query.lon).await?;
    Ok(Json(resolved))
}
