use anyhow::anyhow;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::{
    ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
};

use crate::error::ApiError;
use crate::model::{
    Address, Cinema, Movie, NewAddress, NewCinema, NewMovie, NewSession, Session,
};
use crate::DbPool;

pub fn get_conn(pool: &DbPool) -> Result<PooledConnection<ConnectionManager<PgConnection>>, ApiError> {
    pool.get()
        .map_err(|e| anyhow!("Couldn't get db connection from pool: {}", e).into())
}

pub fn find_movie(conn: &mut PgConnection, movie_id: i32) -> Result<Movie, ApiError> {
    use crate::schema::movies::dsl::*;

    movies
        .find(movie_id)
        .select(Movie::as_select())
        .first(conn)
        .optional()
        .map_err(|e| anyhow!("{}", e))?
        .ok_or(ApiError::not_found("movie", movie_id))
}

pub fn list_movies(conn: &mut PgConnection, skip: i64, take: i64) -> Result<Vec<Movie>, ApiError> {
    use crate::schema::movies::dsl::*;

    let page = movies
        .select(Movie::as_select())
        .order(id.asc())
        .offset(skip)
        .limit(take)
        .load(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(page)
}

pub fn list_all_movies(conn: &mut PgConnection) -> Result<Vec<Movie>, ApiError> {
    use crate::schema::movies::dsl::*;

    let rows = movies
        .select(Movie::as_select())
        .order(id.asc())
        .load(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(rows)
}

pub fn insert_movie(conn: &mut PgConnection, new_movie: NewMovie) -> Result<Movie, ApiError> {
    use crate::schema::movies::dsl::*;

    let movie = diesel::insert_into(movies)
        .values(&new_movie)
        .returning(Movie::as_returning())
        .get_result(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(movie)
}

pub fn update_movie(conn: &mut PgConnection, movie_id: i32, changes: NewMovie) -> Result<(), ApiError> {
    use crate::schema::movies::dsl::*;

    let updated = diesel::update(movies.find(movie_id))
        .set(&changes)
        .execute(conn)
        .map_err(|e| anyhow!("{}", e))?;
    if updated == 0 {
        return Err(ApiError::not_found("movie", movie_id));
    }
    Ok(())
}

pub fn delete_movie(conn: &mut PgConnection, movie_id: i32) -> Result<(), ApiError> {
    use crate::schema::movies::dsl::*;

    let deleted = diesel::delete(movies.find(movie_id))
        .execute(conn)
        .map_err(|e| anyhow!("{}", e))?;
    if deleted == 0 {
        return Err(ApiError::not_found("movie", movie_id));
    }
    Ok(())
}

pub fn find_address(conn: &mut PgConnection, address_id: i32) -> Result<Address, ApiError> {
    use crate::schema::addresses::dsl::*;

    addresses
        .find(address_id)
        .select(Address::as_select())
        .first(conn)
        .optional()
        .map_err(|e| anyhow!("{}", e))?
        .ok_or(ApiError::not_found("address", address_id))
}

pub fn list_addresses(conn: &mut PgConnection, skip: i64, take: i64) -> Result<Vec<Address>, ApiError> {
    use crate::schema::addresses::dsl::*;

    let page = addresses
        .select(Address::as_select())
        .order(id.asc())
        .offset(skip)
        .limit(take)
        .load(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(page)
}

pub fn list_all_addresses(conn: &mut PgConnection) -> Result<Vec<Address>, ApiError> {
    use crate::schema::addresses::dsl::*;

    let rows = addresses
        .select(Address::as_select())
        .order(id.asc())
        .load(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(rows)
}

pub fn insert_address(conn: &mut PgConnection, new_address: NewAddress) -> Result<Address, ApiError> {
    use crate::schema::addresses::dsl::*;

    let address = diesel::insert_into(addresses)
        .values(&new_address)
        .returning(Address::as_returning())
        .get_result(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(address)
}

pub fn update_address(
    conn: &mut PgConnection,
    address_id: i32,
    changes: NewAddress,
) -> Result<(), ApiError> {
    use crate::schema::addresses::dsl::*;

    let updated = diesel::update(addresses.find(address_id))
        .set(&changes)
        .execute(conn)
        .map_err(|e| anyhow!("{}", e))?;
    if updated == 0 {
        return Err(ApiError::not_found("address", address_id));
    }
    Ok(())
}

pub fn delete_address(conn: &mut PgConnection, address_id: i32) -> Result<(), ApiError> {
    use crate::schema::addresses::dsl::*;

    let deleted = diesel::delete(addresses.find(address_id))
        .execute(conn)
        .map_err(|e| anyhow!("{}", e))?;
    if deleted == 0 {
        return Err(ApiError::not_found("address", address_id));
    }
    Ok(())
}

pub fn find_cinema(conn: &mut PgConnection, cinema_id: i32) -> Result<Cinema, ApiError> {
    use crate::schema::cinemas::dsl::*;

    cinemas
        .find(cinema_id)
        .select(Cinema::as_select())
        .first(conn)
        .optional()
        .map_err(|e| anyhow!("{}", e))?
        .ok_or(ApiError::not_found("cinema", cinema_id))
}

pub fn list_cinemas(conn: &mut PgConnection, skip: i64, take: i64) -> Result<Vec<Cinema>, ApiError> {
    use crate::schema::cinemas::dsl::*;

    let page = cinemas
        .select(Cinema::as_select())
        .order(id.asc())
        .offset(skip)
        .limit(take)
        .load(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(page)
}

pub fn list_all_cinemas(conn: &mut PgConnection) -> Result<Vec<Cinema>, ApiError> {
    use crate::schema::cinemas::dsl::*;

    let rows = cinemas
        .select(Cinema::as_select())
        .order(id.asc())
        .load(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(rows)
}

pub fn insert_cinema(conn: &mut PgConnection, new_cinema: NewCinema) -> Result<Cinema, ApiError> {
    find_address(conn, new_cinema.address_id)?;

    use crate::schema::cinemas::dsl::*;

    let cinema = diesel::insert_into(cinemas)
        .values(&new_cinema)
        .returning(Cinema::as_returning())
        .get_result(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(cinema)
}

pub fn update_cinema(conn: &mut PgConnection, cinema_id: i32, changes: NewCinema) -> Result<(), ApiError> {
    find_address(conn, changes.address_id)?;

    use crate::schema::cinemas::dsl::*;

    let updated = diesel::update(cinemas.find(cinema_id))
        .set(&changes)
        .execute(conn)
        .map_err(|e| anyhow!("{}", e))?;
    if updated == 0 {
        return Err(ApiError::not_found("cinema", cinema_id));
    }
    Ok(())
}

pub fn delete_cinema(conn: &mut PgConnection, cinema_id: i32) -> Result<(), ApiError> {
    use crate::schema::cinemas::dsl::*;

    let deleted = diesel::delete(cinemas.find(cinema_id))
        .execute(conn)
        .map_err(|e| anyhow!("{}", e))?;
    if deleted == 0 {
        return Err(ApiError::not_found("cinema", cinema_id));
    }
    Ok(())
}

pub fn find_session(conn: &mut PgConnection, session_id: i32) -> Result<Session, ApiError> {
    use crate::schema::sessions::dsl::*;

    sessions
        .find(session_id)
        .select(Session::as_select())
        .first(conn)
        .optional()
        .map_err(|e| anyhow!("{}", e))?
        .ok_or(ApiError::not_found("session", session_id))
}

pub fn list_sessions(conn: &mut PgConnection, skip: i64, take: i64) -> Result<Vec<Session>, ApiError> {
    use crate::schema::sessions::dsl::*;

    let page = sessions
        .select(Session::as_select())
        .order(id.asc())
        .offset(skip)
        .limit(take)
        .load(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(page)
}

pub fn list_all_sessions(conn: &mut PgConnection) -> Result<Vec<Session>, ApiError> {
    use crate::schema::sessions::dsl::*;

    let rows = sessions
        .select(Session::as_select())
        .order(id.asc())
        .load(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(rows)
}

pub fn insert_session(conn: &mut PgConnection, new_session: NewSession) -> Result<Session, ApiError> {
    find_movie(conn, new_session.movie_id)?;
    find_cinema(conn, new_session.cinema_id)?;

    use crate::schema::sessions::dsl::*;

    let session = diesel::insert_into(sessions)
        .values(&new_session)
        .returning(Session::as_returning())
        .get_result(conn)
        .map_err(|e| anyhow!("{}", e))?;
    Ok(session)
}

pub fn update_session(
    conn: &mut PgConnection,
    session_id: i32,
    changes: NewSession,
) -> Result<(), ApiError> {
    find_movie(conn, changes.movie_id)?;
    find_cinema(conn, changes.cinema_id)?;

    use crate::schema::sessions::dsl::*;

    let updated = diesel::update(sessions.find(session_id))
        .set(&changes)
        .execute(conn)
        .map_err(|e| anyhow!("{}", e))?;
    if updated == 0 {
        return Err(ApiError::not_found("session", session_id));
    }
    Ok(())
}

pub fn delete_session(conn: &mut PgConnection, session_id: i32) -> Result<(), ApiError> {
    use crate::schema::sessions::dsl::*;

    let deleted = diesel::delete(sessions.find(session_id))
        .execute(conn)
        .map_err(|e| anyhow!("{}", e))?;
    if deleted == 0 {
        return Err(ApiError::not_found("session", session_id));
    }
    Ok(())
}
