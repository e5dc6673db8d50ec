use serde::Deserialize;

const MAX_TAKE: i64 = 100;

fn default_take() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_take")]
    pub take: i64,
}

impl PageQuery {
    pub fn offset(&self) -> i64 {
        self.skip.max(0)
    }

    // take is capped so a single request cannot drain the whole table.
    pub fn limit(&self) -> i64 {
        self.take.clamp(0, MAX_TAKE)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::web::Query;

    use super::*;

    #[test]
    fn defaults_are_skip_zero_take_fifty() {
        let query = Query::<PageQuery>::from_query("").unwrap();
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 50);
    }

    #[test]
    fn explicit_values_are_kept() {
        let query = Query::<PageQuery>::from_query("skip=10&take=2").unwrap();
        assert_eq!(query.offset(), 10);
        assert_eq!(query.limit(), 2);
    }

    #[test]
    fn negative_values_are_clamped_to_zero() {
        let query = Query::<PageQuery>::from_query("skip=-5&take=-1").unwrap();
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 0);
    }

    #[test]
    fn oversized_take_is_capped() {
        let query = Query::<PageQuery>::from_query("take=100000").unwrap();
        assert_eq!(query.limit(), MAX_TAKE);
    }
}
