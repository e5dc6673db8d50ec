use actix_web::http::header;
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::model::{Cinema, NewCinema};
use crate::query::PageQuery;
use crate::validation::{list_errors, ValidationFailure};
use crate::{db, DbPool};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaInput {
    pub name: String,
    pub number_halls: i32,
    pub address_id: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaPatch {
    pub name: Option<String>,
    pub number_halls: Option<i32>,
    pub address_id: Option<i32>,
}

impl CinemaPatch {
    fn apply(self, input: &mut CinemaInput) {
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(number_halls) = self.number_halls {
            input.number_halls = number_halls;
        }
        if let Some(address_id) = self.address_id {
            input.address_id = address_id;
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaResponse {
    pub id: i32,
    pub name: String,
    pub number_halls: i32,
    pub address_id: i32,
    pub search_timestamp: String,
}

impl From<CinemaInput> for NewCinema {
    fn from(input: CinemaInput) -> Self {
        NewCinema {
            name: input.name,
            number_halls: input.number_halls,
            address_id: input.address_id,
        }
    }
}

impl From<Cinema> for CinemaInput {
    fn from(cinema: Cinema) -> Self {
        CinemaInput {
            name: cinema.name,
            number_halls: cinema.number_halls,
            address_id: cinema.address_id,
        }
    }
}

impl From<Cinema> for CinemaResponse {
    fn from(cinema: Cinema) -> Self {
        CinemaResponse {
            id: cinema.id,
            name: cinema.name,
            number_halls: cinema.number_halls,
            address_id: cinema.address_id,
            search_timestamp: Local::now().format("%H:%M:%S %d/%m/%Y").to_string(),
        }
    }
}

fn validate_cinema(input: &CinemaInput) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    let name_len = input.name.trim().chars().count();
    if name_len == 0 {
        failures.push(ValidationFailure::new(
            "name",
            "The cinema name is required.",
        ));
    } else if !(3..=100).contains(&name_len) {
        failures.push(ValidationFailure::new(
            "name",
            "The name must be between 3 and 100 characters.",
        ));
    }

    if !(1..=50).contains(&input.number_halls) {
        failures.push(ValidationFailure::new(
            "numberHalls",
            "The number of halls must be between 1 and 50.",
        ));
    }

    if input.address_id < 1 {
        failures.push(ValidationFailure::new(
            "addressId",
            "The address ID must be at least 1.",
        ));
    }

    failures
}

#[post("/cinema")]
pub async fn add_cinema(
    pool: web::Data<DbPool>,
    body: web::Json<CinemaInput>,
) -> Result<HttpResponse> {
    let input = body.into_inner();

    let failures = validate_cinema(&input);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    let cinema = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::insert_cinema(&mut conn, input.into())
    })
    .await??;

    let response = CinemaResponse::from(cinema);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/cinema/{}", response.id)))
        .json(response))
}

#[get("/cinema")]
pub async fn get_cinemas_pagination(
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (skip, take) = (query.offset(), query.limit());

    let cinemas = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::list_cinemas(&mut conn, skip, take)
    })
    .await??;

    let response: Vec<CinemaResponse> = cinemas.into_iter().map(CinemaResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/cinema/all")]
pub async fn get_all_cinemas(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let cinemas = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::list_all_cinemas(&mut conn)
    })
    .await??;

    let response: Vec<CinemaResponse> = cinemas.into_iter().map(CinemaResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/cinema/{id}")]
pub async fn get_cinema_by_id(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let cinema_id = path.into_inner();

    let cinema = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::find_cinema(&mut conn, cinema_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(CinemaResponse::from(cinema)))
}

#[put("/cinema/{id}")]
pub async fn update_cinema(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<CinemaInput>,
) -> Result<HttpResponse> {
    let cinema_id = path.into_inner();
    let input = body.into_inner();

    let lookup_pool = pool.clone();
    web::block(move || {
        let mut conn = db::get_conn(&lookup_pool)?;
        db::find_cinema(&mut conn, cinema_id)
    })
    .await??;

    let failures = validate_cinema(&input);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::update_cinema(&mut conn, cinema_id, input.into())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[patch("/cinema/{id}")]
pub async fn patch_cinema(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<CinemaPatch>,
) -> Result<HttpResponse> {
    let cinema_id = path.into_inner();
    let patch = body.into_inner();

    let lookup_pool = pool.clone();
    let cinema = web::block(move || {
        let mut conn = db::get_conn(&lookup_pool)?;
        db::find_cinema(&mut conn, cinema_id)
    })
    .await??;

    let mut shadow = CinemaInput::from(cinema);
    patch.apply(&mut shadow);

    let failures = validate_cinema(&shadow);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::update_cinema(&mut conn, cinema_id, shadow.into())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[delete("/cinema/{id}")]
pub async fn delete_cinema(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let cinema_id = path.into_inner();

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::delete_cinema(&mut conn, cinema_id)
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // /cinema/all must win over /cinema/{id}
    cfg.service(add_cinema)
        .service(get_cinemas_pagination)
        .service(get_all_cinemas)
        .service(get_cinema_by_id)
        .service(update_cinema)
        .service(patch_cinema)
        .service(delete_cinema);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CinemaInput {
        CinemaInput {
            name: "Cine Odeon".to_string(),
            number_halls: 6,
            address_id: 1,
        }
    }

    #[test]
    fn accepts_a_valid_cinema() {
        assert!(validate_cinema(&valid_input()).is_empty());
    }

    #[test]
    fn rejects_an_empty_name() {
        let mut input = valid_input();
        input.name = String::new();

        let failures = validate_cinema(&input);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "name");
        assert_eq!(failures[0].message, "The cinema name is required.");
    }

    #[test]
    fn rejects_hall_counts_outside_the_range() {
        let mut input = valid_input();
        input.number_halls = 0;
        assert_eq!(validate_cinema(&input)[0].field, "numberHalls");

        input.number_halls = 51;
        assert_eq!(validate_cinema(&input)[0].field, "numberHalls");

        input.number_halls = 1;
        assert!(validate_cinema(&input).is_empty());
        input.number_halls = 50;
        assert!(validate_cinema(&input).is_empty());
    }

    #[test]
    fn rejects_a_non_positive_address_id() {
        let mut input = valid_input();
        input.address_id = 0;

        let failures = validate_cinema(&input);
        assert_eq!(failures[0].field, "addressId");
    }

    #[test]
    fn patch_changes_only_the_given_field() {
        let mut shadow = valid_input();
        let patch = CinemaPatch {
            number_halls: Some(12),
            ..CinemaPatch::default()
        };

        patch.apply(&mut shadow);

        assert_eq!(shadow.number_halls, 12);
        assert_eq!(shadow.name, "Cine Odeon");
        assert_eq!(shadow.address_id, 1);
    }

    #[test]
    fn response_includes_the_address_reference() {
        let cinema = Cinema {
            id: 2,
            name: "Cine Odeon".to_string(),
            number_halls: 6,
            address_id: 4,
        };

        let response = CinemaResponse::from(cinema);
        assert_eq!(response.id, 2);
        assert_eq!(response.address_id, 4);
        assert!(!response.search_timestamp.is_empty());
    }
}
