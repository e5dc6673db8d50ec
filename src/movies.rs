use actix_web::http::header;
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::model::{Movie, NewMovie};
use crate::query::PageQuery;
use crate::validation::{list_errors, ValidationFailure};
use crate::{db, DbPool};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    pub title: String,
    pub release_year: i32,
    pub duration: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePatch {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub duration: Option<i32>,
}

impl MoviePatch {
    fn apply(self, input: &mut MovieInput) {
        if let Some(title) = self.title {
            input.title = title;
        }
        if let Some(release_year) = self.release_year {
            input.release_year = release_year;
        }
        if let Some(duration) = self.duration {
            input.duration = duration;
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub duration: i32,
    pub search_timestamp: String,
}

impl From<MovieInput> for NewMovie {
    fn from(input: MovieInput) -> Self {
        NewMovie {
            title: input.title,
            release_year: input.release_year,
            duration: input.duration,
        }
    }
}

impl From<Movie> for MovieInput {
    fn from(movie: Movie) -> Self {
        MovieInput {
            title: movie.title,
            release_year: movie.release_year,
            duration: movie.duration,
        }
    }
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        MovieResponse {
            id: movie.id,
            title: movie.title,
            release_year: movie.release_year,
            duration: movie.duration,
            search_timestamp: Local::now().format("%H:%M:%S %d/%m/%Y").to_string(),
        }
    }
}

fn validate_movie(input: &MovieInput) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    let title_len = input.title.trim().chars().count();
    if title_len == 0 {
        failures.push(ValidationFailure::new(
            "title",
            "The movie title is required.",
        ));
    } else if !(3..=100).contains(&title_len) {
        failures.push(ValidationFailure::new(
            "title",
            "The title must be between 3 and 100 characters.",
        ));
    }

    let current_year = Local::now().year();
    if input.release_year < 1850 || input.release_year > current_year {
        failures.push(ValidationFailure::new(
            "releaseYear",
            "The release year must be between 1850 and the current year.",
        ));
    }

    if !(70..=600).contains(&input.duration) {
        failures.push(ValidationFailure::new(
            "duration",
            "The duration must be between 70 and 600 minutes.",
        ));
    }

    failures
}

#[post("/movie")]
pub async fn add_movie(
    pool: web::Data<DbPool>,
    body: web::Json<MovieInput>,
) -> Result<HttpResponse> {
    let input = body.into_inner();

    let failures = validate_movie(&input);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    let movie = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::insert_movie(&mut conn, input.into())
    })
    .await??;

    let response = MovieResponse::from(movie);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/movie/{}", response.id)))
        .json(response))
}

#[get("/movie")]
pub async fn get_movies_pagination(
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (skip, take) = (query.offset(), query.limit());

    let movies = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::list_movies(&mut conn, skip, take)
    })
    .await??;

    let response: Vec<MovieResponse> = movies.into_iter().map(MovieResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/movie/all")]
pub async fn get_all_movies(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let movies = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::list_all_movies(&mut conn)
    })
    .await??;

    let response: Vec<MovieResponse> = movies.into_iter().map(MovieResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/movie/{id}")]
pub async fn get_movie_by_id(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let movie_id = path.into_inner();

    let movie = web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::find_movie(&mut conn, movie_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(MovieResponse::from(movie)))
}

#[put("/movie/{id}")]
pub async fn update_movie(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<MovieInput>,
) -> Result<HttpResponse> {
    let movie_id = path.into_inner();
    let input = body.into_inner();

    let lookup_pool = pool.clone();
    web::block(move || {
        let mut conn = db::get_conn(&lookup_pool)?;
        db::find_movie(&mut conn, movie_id)
    })
    .await??;

    let failures = validate_movie(&input);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::update_movie(&mut conn, movie_id, input.into())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[patch("/movie/{id}")]
pub async fn patch_movie(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<MoviePatch>,
) -> Result<HttpResponse> {
    let movie_id = path.into_inner();
    let patch = body.into_inner();

    let lookup_pool = pool.clone();
    let movie = web::block(move || {
        let mut conn = db::get_conn(&lookup_pool)?;
        db::find_movie(&mut conn, movie_id)
    })
    .await??;

    let mut shadow = MovieInput::from(movie);
    patch.apply(&mut shadow);

    let failures = validate_movie(&shadow);
    if !failures.is_empty() {
        return Err(ApiError::Validation(list_errors(&failures)));
    }

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::update_movie(&mut conn, movie_id, shadow.into())
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[delete("/movie/{id}")]
pub async fn delete_movie(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let movie_id = path.into_inner();

    web::block(move || {
        let mut conn = db::get_conn(&pool)?;
        db::delete_movie(&mut conn, movie_id)
    })
    .await??;

    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // /movie/all must win over /movie/{id}
    cfg.service(add_movie)
        .service(get_movies_pagination)
        .service(get_all_movies)
        .service(get_movie_by_id)
        .service(update_movie)
        .service(patch_movie)
        .service(delete_movie);
}
