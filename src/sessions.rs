use actix_web::http::header;
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::model::{NewSession, Session};
use crate::query::PageQuery;
use crate::validation::{list_errors, ValidationFailure};
use crate::{db, DbPool};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub movie_id: i32,
    pub cinema_id: i32,
    pub start_time: NaiveDateTime,
    pub ticket_price: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    pub movie_id: Option<i32>,
    pub cinema_id: Option<i32>,
    pub start_time: Option<NaiveDateTime>,
    pub ticket_price: Option<f64>,
}

impl SessionPatch {
    fn apply(self, input: &mut SessionInput) {
        if let Some(movie_id) = self.movie_id {
            input.movie_id = movie_id;
        }
        if let Some(cinema_id) = self.cinema_id {
            input.cinema_id = cinema_id;
        }
        if let Some(start_time) = self.start_time {
            input.start_time = start_time;
        }
        if let Some(ticket_price) = self.ticket_price {
            input.ticket_price = ticket_price;
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: i32,
    pub movie_id: i32,
    pub cinema_id: i32,
    pub start_time: NaiveDateTime,
    pub ticket_price: f64,
    pub search_timestamp: String,
}

impl From<SessionInput> for NewSession {
    fn from(input: SessionInput) -> Self {
        NewSession {
            movie_id: input.movie_id,
            cinema_id: input.cinema_id,
            start_time: input.start_time,
            ticket_price: input.ticket_price,
        }
    }
}

impl From<Session> for SessionInput {
    fn from(session: Session) -> Self {
        SessionInput {
            movie_id: session.movie_id,
            cinema_id: session.cinema_id,
            start_time: session.start_time,
            ticket_price: session.ticket_price,
        }
    }
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        SessionResponse {
            id: session.id,
            movie_id: session.movie_id,
            cinema_id: session.cinema_id,
            start_time: session.start_time,
            ticket_price: session.ticket_price,
            search_timestamp: Local::now().format("%H:%M:%S %d/%m/%Y").to_string(),
        }
    }
}

fn validate_session(input: &SessionInput) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    if input.movie_id < 1 {
        failures.push(ValidationFailure::new(
            "movieId",
            "The movie ID must be at least 1.",
        ));
    }

    if input.cinema_id < 1 {
        failures.push(ValidationFailure::new(
            "cinemaId",
            "The cinema ID must be at least 1.",
        ));
    }

    if input.start_time.year() < Local::now().year() {
        failures.push(ValidationFailure::new(
            "startTime",
            "The session date must be in the current year or later.",
        ));
    }

    if !(9..=23).contains(&input.start_time.hour()) {
        failures.push(ValidationFailure::new(
            "startTime",
            "The start time must be between 9h and 23h.",
        ));
    }

    if input.ticket_price <= 0.0 {
        failures.push(ValidationFailure::new(
            "ticketPrice",
            "The ticket price must be greater than zero.",
        ));
    }

    failures
}

#[post("/session")]
pub async fn add_session(
    pool: web::Data<DbPool>,
    body: web::Json<SessionInput>,
) -> Result<HttpResponse> {
    let input = body.into_inner();

    let failures = validate_session(&input);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    let session = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::insert_session(&mut conn, input.into())
    })
    .await??;

    let response = SessionResponse::from(session);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/session/{}", response.id)))
        .json(response))
}

#[get("/session")]
pub async fn get_sessions_pagination(
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (skip, take) = (query.offset(), query.limit());

    let sessions = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::list_sessions(&mut conn, skip, take)
    })
    .await??;

    let response: Vec<SessionResponse> = sessions.into_iter().map(SessionResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/session/all")]
pub async fn get_all_sessions(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let sessions = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::list_all_sessions(&mut conn)
    })
    .await??;

    let response: Vec<SessionResponse> = sessions.into_iter().map(SessionResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/session/{id}")]
pub async fn get_session_by_id(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let session_id = path.into_inner();

    let session = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::find_session(&mut conn, session_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(SessionResponse::from(session)))
}

#[put("/session/{id}")]
pub async fn update_session(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<SessionInput>,
) -> Result<HttpResponse> {
    let session_id = path.into_inner();
    let input = body.into_inner();

    let lookup_pool = pool.clone();
    web::block(move || {
        let mut conn = db::get_conn(&lookup_pool)?;
        db::find_session(&mut conn, session_id)
    })
    .await??;

    let failures = validate_session(&input);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::update_session(&mut conn, session_id, input.into())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[patch("/session/{id}")]
pub async fn patch_session(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<SessionPatch>,
) -> Result<HttpResponse> {
    let session_id = path.into_inner();
    let patch = body.into_inner();

    let lookup_pool = pool.clone();
    let session = web::block(move || {
        let mut conn = db::get_conn(&lookup_pool)?;
        db::find_session(&mut conn, session_id)
    })
    .await??;

    let mut shadow = SessionInput::from(session);
    patch.apply(&mut shadow);

    let failures = validate_session(&shadow);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::update_session(&mut conn, session_id, shadow.into())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[delete("/session/{id}")]
pub async fn delete_session(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let session_id = path.into_inner();

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::delete_session(&mut conn, session_id)
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // /session/all must win over /session/{id}
    cfg.service(add_session)
        .service(get_sessions_pagination)
        .service(get_all_sessions)
        .service(get_session_by_id)
        .service(update_session)
        .service(patch_session)
        .service(delete_session);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn start_time(year: i32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 7, 15)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn valid_input() -> SessionInput {
        SessionInput {
            movie_id: 1,
            cinema_id: 1,
            start_time: start_time(Local::now().year() + 1, 20),
            ticket_price: 25.0,
        }
    }

    #[test]
    fn accepts_a_valid_session() {
        assert!(validate_session(&valid_input()).is_empty());
    }

    #[test]
    fn rejects_non_positive_references() {
        let mut input = valid_input();
        input.movie_id = 0;
        input.cinema_id = -3;

        let failures = validate_session(&input);
        let fields: Vec<&str> = failures.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["movieId", "cinemaId"]);
    }

    #[test]
    fn rejects_a_start_time_in_a_past_year() {
        let mut input = valid_input();
        input.start_time = start_time(Local::now().year() - 1, 20);

        let failures = validate_session(&input);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "startTime");
        assert!(failures[0].message.contains("current year"));
    }

    #[test]
    fn accepts_the_current_year() {
        let mut input = valid_input();
        input.start_time = start_time(Local::now().year(), 20);
        assert!(validate_session(&input).is_empty());
    }

    #[test]
    fn rejects_hours_outside_the_window() {
        let mut input = valid_input();
        input.start_time = start_time(Local::now().year() + 1, 8);
        assert_eq!(validate_session(&input)[0].field, "startTime");

        input.start_time = start_time(Local::now().year() + 1, 0);
        assert_eq!(validate_session(&input)[0].field, "startTime");

        input.start_time = start_time(Local::now().year() + 1, 9);
        assert!(validate_session(&input).is_empty());
        input.start_time = start_time(Local::now().year() + 1, 23);
        assert!(validate_session(&input).is_empty());
    }

    #[test]
    fn rejects_a_non_positive_ticket_price() {
        let mut input = valid_input();
        input.ticket_price = 0.0;
        assert_eq!(validate_session(&input)[0].field, "ticketPrice");

        input.ticket_price = -1.0;
        assert_eq!(validate_session(&input)[0].field, "ticketPrice");

        input.ticket_price = 0.01;
        assert!(validate_session(&input).is_empty());
    }

    #[test]
    fn patch_changes_only_the_given_field() {
        let mut shadow = valid_input();
        let patch = SessionPatch {
            ticket_price: Some(32.5),
            ..SessionPatch::default()
        };

        patch.apply(&mut shadow);

        assert_eq!(shadow.ticket_price, 32.5);
        assert_eq!(shadow.movie_id, 1);
        assert_eq!(shadow.cinema_id, 1);
        assert_eq!(shadow.start_time, valid_input().start_time);
    }

    #[test]
    fn response_copies_fields_and_stamps_the_read_time() {
        let session = Session {
            id: 11,
            movie_id: 2,
            cinema_id: 3,
            start_time: start_time(Local::now().year(), 21),
            ticket_price: 18.0,
        };

        let response = SessionResponse::from(session);
        assert_eq!(response.id, 11);
        assert_eq!(response.movie_id, 2);
        assert_eq!(response.cinema_id, 3);
        assert_eq!(response.ticket_price, 18.0);
        assert!(!response.search_timestamp.is_empty());
    }
}
