use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use sqlx::any::{AnyConnectOptions, AnyPoolOptions, install_default_drivers};
use sqlx::{AnyPool, ConnectOptions, Connection, Row};

use crate::types::{ArticleStat, AuthorStat, ErrorDay, StoreError, StoreResult};

// Successful requests per path, shared by the article and author queries.
// Only 2xx responses count as a read.
const PATH_VIEWS_CTE: &str = r#"
    WITH path_views AS (
        SELECT path, COUNT(*) AS views
        FROM log
        WHERE status LIKE '2%'
        GROUP BY path
    )
"#;

const TOP_ARTICLES_SELECT: &str = r#"
    SELECT a.title AS title, CAST(pv.views AS BIGINT) AS views
    FROM articles a
    JOIN path_views pv ON pv.path = '/article/' || a.slug
    ORDER BY pv.views DESC, a.title ASC
    LIMIT $1
"#;

const AUTHOR_RANKING_SELECT: &str = r#"
    SELECT au.name AS name, CAST(COALESCE(SUM(pv.views), 0) AS BIGINT) AS views
    FROM authors au
    LEFT JOIN articles a ON a.author = au.id
    LEFT JOIN path_views pv ON pv.path = '/article/' || a.slug
    GROUP BY au.id, au.name
    ORDER BY views DESC, au.name ASC
"#;

const HIGH_ERROR_DAYS: &str = r#"
    SELECT
        CAST(date(time) AS TEXT) AS day,
        CAST(SUM(CASE WHEN status LIKE '2%' THEN 0 ELSE 1 END) AS BIGINT) AS errors,
        CAST(COUNT(*) AS BIGINT) AS requests
    FROM log
    GROUP BY date(time)
    HAVING CAST(SUM(CASE WHEN status LIKE '2%' THEN 0 ELSE 1 END) AS DOUBLE PRECISION) * 100.0
        / COUNT(*) > CAST($1 AS DOUBLE PRECISION)
    ORDER BY day ASC
"#;

/// Read-only access to the traffic log database.
///
/// Every query acquires the single pooled connection for its own duration and
/// hands it back when the query returns, whether it succeeded or not.
#[derive(Clone, Debug)]
pub struct SqlStore {
    pool: AnyPool,
}

impl SqlStore {
    /// Connect to `connection_string` (any PostgreSQL or SQLite URL).
    ///
    /// The database is reached once up front with a plain connection: the pool
    /// retries refused connections until its acquire timeout and then only
    /// reports `PoolTimedOut`, while a direct connect fails with the cause.
    pub async fn connect(connection_string: &str) -> StoreResult<Self> {
        install_default_drivers();
        let options = AnyConnectOptions::from_str(connection_string)?;

        let conn = options.connect().await?;
        conn.close().await?;
        debug!("Database is reachable");

        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy_with(options);
        Ok(Self { pool })
    }

    pub async fn top_articles(&self, limit: u32) -> StoreResult<Vec<ArticleStat>> {
        let mut conn = self.pool.acquire().await?;
        let query = format!("{PATH_VIEWS_CTE}{TOP_ARTICLES_SELECT}");
        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .fetch_all(&mut *conn)
            .await?;
        debug!("top articles query returned {} row(s)", rows.len());

        let mut articles = Vec::with_capacity(rows.len());
        for row in rows {
            articles.push(ArticleStat {
                title: row.try_get("title")?,
                views: row.try_get("views")?,
            });
        }
        Ok(articles)
    }

    pub async fn author_ranking(&self) -> StoreResult<Vec<AuthorStat>> {
        let mut conn = self.pool.acquire().await?;
        let query = format!("{PATH_VIEWS_CTE}{AUTHOR_RANKING_SELECT}");
        let rows = sqlx::query(&query).fetch_all(&mut *conn).await?;
        debug!("author ranking query returned {} row(s)", rows.len());

        let mut authors = Vec::with_capacity(rows.len());
        for row in rows {
            authors.push(AuthorStat {
                name: row.try_get("name")?,
                views: row.try_get("views")?,
            });
        }
        Ok(authors)
    }

    /// Days whose error percentage is strictly greater than `threshold`
    pub async fn high_error_days(&self, threshold: f64) -> StoreResult<Vec<ErrorDay>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(HIGH_ERROR_DAYS)
            .bind(threshold)
            .fetch_all(&mut *conn)
            .await?;
        debug!("error days query returned {} row(s)", rows.len());

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            let day: Option<String> = row.try_get("day")?;
            let day = day.ok_or_else(|| StoreError::InvalidDate("NULL".to_string()))?;
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .map_err(|_| StoreError::InvalidDate(day.clone()))?;
            days.push(ErrorDay::new(
                date,
                row.try_get("errors")?,
                row.try_get("requests")?,
            ));
        }
        Ok(days)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
