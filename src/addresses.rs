use actix_web::http::header;
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::model::{Address, NewAddress};
use crate::query::PageQuery;
use crate::validation::{list_errors, ValidationFailure};
use crate::{db, DbPool};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub neighborhood: String,
    pub street: String,
    pub number: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    pub neighborhood: Option<String>,
    pub street: Option<String>,
    pub number: Option<i32>,
}

impl AddressPatch {
    fn apply(self, input: &mut AddressInput) {
        if let Some(neighborhood) = self.neighborhood {
            input.neighborhood = neighborhood;
        }
        if let Some(street) = self.street {
            input.street = street;
        }
        if let Some(number) = self.number {
            input.number = number;
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: i32,
    pub neighborhood: String,
    pub street: String,
    pub number: i32,
    pub search_timestamp: String,
}

impl From<AddressInput> for NewAddress {
    fn from(input: AddressInput) -> Self {
        NewAddress {
            neighborhood: input.neighborhood,
            street: input.street,
            number: input.number,
        }
    }
}

impl From<Address> for AddressInput {
    fn from(address: Address) -> Self {
        AddressInput {
            neighborhood: address.neighborhood,
            street: address.street,
            number: address.number,
        }
    }
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        AddressResponse {
            id: address.id,
            neighborhood: address.neighborhood,
            street: address.street,
            number: address.number,
            search_timestamp: Local::now().format("%H:%M:%S %d/%m/%Y").to_string(),
        }
    }
}

fn validate_address(input: &AddressInput) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    let neighborhood_len = input.neighborhood.trim().chars().count();
    if neighborhood_len == 0 {
        failures.push(ValidationFailure::new(
            "neighborhood",
            "The neighborhood name is required.",
        ));
    } else if !(3..=100).contains(&neighborhood_len) {
        failures.push(ValidationFailure::new(
            "neighborhood",
            "The name must be between 3 and 100 characters.",
        ));
    }

    let street_len = input.street.trim().chars().count();
    if street_len == 0 {
        failures.push(ValidationFailure::new(
            "street",
            "The street name is required.",
        ));
    } else if !(3..=100).contains(&street_len) {
        failures.push(ValidationFailure::new(
            "street",
            "The name must be between 3 and 100 characters.",
        ));
    }

    if !(1..=5000).contains(&input.number) {
        failures.push(ValidationFailure::new(
            "number",
            "The address number must be between 1 and 5000.",
        ));
    }

    failures
}

#[post("/address")]
pub async fn add_address(
    pool: web::Data<DbPool>,
    body: web::Json<AddressInput>,
) -> Result<HttpResponse> {
    let input = body.into_inner();

    let failures = validate_address(&input);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    let address = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::insert_address(&mut conn, input.into())
    })
    .await??;

    let response = AddressResponse::from(address);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/address/{}", response.id)))
        .json(response))
}

#[get("/address")]
pub async fn get_addresses_pagination(
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (skip, take) = (query.offset(), query.limit());

    let addresses = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::list_addresses(&mut conn, skip, take)
    })
    .await??;

    let response: Vec<AddressResponse> = addresses.into_iter().map(AddressResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/address/all")]
pub async fn get_all_addresses(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let addresses = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::list_all_addresses(&mut conn)
    })
    .await??;

    let response: Vec<AddressResponse> = addresses.into_iter().map(AddressResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/address/{id}")]
pub async fn get_address_by_id(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let address_id = path.into_inner();

    let address = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::find_address(&mut conn, address_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(AddressResponse::from(address)))
}

#[put("/address/{id}")]
pub async fn update_address(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<AddressInput>,
) -> Result<HttpResponse> {
    let address_id = path.into_inner();
    let input = body.into_inner();

    let lookup_pool = pool.clone();
    web::block(move || {
        let mut conn = db::get_conn(&lookup_pool)?;
        db::find_address(&mut conn, address_id)
    })
    .await??;

    let failures = validate_address(&input);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::update_address(&mut conn, address_id, input.into())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[patch("/address/{id}")]
pub async fn patch_address(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<AddressPatch>,
) -> Result<HttpResponse> {
    let address_id = path.into_inner();
    let patch = body.into_inner();

    let lookup_pool = pool.clone();
    let address = web::block(move || {
        let mut conn = db::get_conn(&lookup_pool)?;
        db::find_address(&mut conn, address_id)
    })
    .await??;

    let mut shadow = AddressInput::from(address);
    patch.apply(&mut shadow);

    let failures = validate_address(&shadow);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::update_address(&mut conn, address_id, shadow.into())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[delete("/address/{id}")]
pub async fn delete_address(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let address_id = path.into_inner();

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::delete_address(&mut conn, address_id)
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // /address/all must win over /address/{id}
    cfg.service(add_address)
        .service(get_addresses_pagination)
        .service(get_all_addresses)
        .service(get_address_by_id)
        .service(update_address)
        .service(patch_address)
        .service(delete_address);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> AddressInput {
        AddressInput {
            neighborhood: "Centro".to_string(),
            street: "Rua Augusta".to_string(),
            number: 1500,
        }
    }

    #[test]
    fn accepts_a_valid_address() {
        assert!(validate_address(&valid_input()).is_empty());
    }

    #[test]
    fn rejects_missing_names() {
        let input = AddressInput {
            neighborhood: String::new(),
            street: " ".to_string(),
            number: 10,
        };

        let failures = validate_address(&input);
        let fields: Vec<&str> = failures.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["neighborhood", "street"]);
        assert!(failures.iter().all(|f| f.message.contains("required")));
    }

    #[test]
    fn rejects_numbers_outside_the_range() {
        let mut input = valid_input();
        input.number = 0;
        assert_eq!(validate_address(&input)[0].field, "number");

        input.number = 5001;
        assert_eq!(validate_address(&input)[0].field, "number");

        input.number = 1;
        assert!(validate_address(&input).is_empty());
        input.number = 5000;
        assert!(validate_address(&input).is_empty());
    }

    #[test]
    fn patch_changes_only_the_given_field() {
        let mut shadow = valid_input();
        let patch = AddressPatch {
            street: Some("Avenida Paulista".to_string()),
            ..AddressPatch::default()
        };

        patch.apply(&mut shadow);

        assert_eq!(shadow.street, "Avenida Paulista");
        assert_eq!(shadow.neighborhood, "Centro");
        assert_eq!(shadow.number, 1500);
    }

    #[test]
    fn response_copies_every_field() {
        let address = Address {
            id: 3,
            neighborhood: "Centro".to_string(),
            street: "Rua Augusta".to_string(),
            number: 1500,
        };

        let response = AddressResponse::from(address);
        assert_eq!(response.id, 3);
        assert_eq!(response.neighborhood, "Centro");
        assert_eq!(response.street, "Rua Augusta");
        assert_eq!(response.number, 1500);
        assert!(!response.search_timestamp.is_empty());
    }
}
