use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable, Selectable};

use crate::schema::*;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub duration: i32,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = movies)]
pub struct NewMovie {
    pub title: String,
    pub release_year: i32,
    pub duration: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Address {
    pub id: i32,
    pub neighborhood: String,
    pub street: String,
    pub number: i32,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = addresses)]
pub struct NewAddress {
    pub neighborhood: String,
    pub street: String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = cinemas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Cinema {
    pub id: i32,
    pub name: String,
    pub number_halls: i32,
    pub address_id: i32,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = cinemas)]
pub struct NewCinema {
    pub name: String,
    pub number_halls: i32,
    pub address_id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Session {
    pub id: i32,
    pub movie_id: i32,
    pub cinema_id: i32,
    pub start_time: NaiveDateTime,
    pub ticket_price: f64,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub movie_id: i32,
    pub cinema_id: i32,
    pub start_time: NaiveDateTime,
    pub ticket_price: f64,
}
