#![allow(dead_code)]

use std::path::PathBuf;

use readerwise::SqlStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tempfile::TempDir;

pub const AUTHORS_DDL: &str = r#"
CREATE TABLE authors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    bio TEXT
);
"#;

pub const ARTICLES_DDL: &str = r#"
CREATE TABLE articles (
    id INTEGER PRIMARY KEY,
    author INTEGER NOT NULL,
    title TEXT NOT NULL,
    slug TEXT UNIQUE NOT NULL,
    lead TEXT,
    body TEXT,
    time TEXT
);
"#;

pub const LOG_DDL: &str = r#"
CREATE TABLE log (
    id INTEGER PRIMARY KEY,
    path TEXT,
    ip TEXT,
    method TEXT,
    status TEXT,
    time TEXT
);
"#;

pub const OK: &str = "200 OK";
pub const NOT_FOUND: &str = "404 NOT FOUND";
pub const SERVER_ERROR: &str = "500 INTERNAL SERVER ERROR";

/// A throwaway SQLite copy of the news database
pub struct NewsDb {
    // Held so the directory outlives the database file
    _dir: TempDir,
    path: PathBuf,
    pool: SqlitePool,
}

impl NewsDb {
    /// Empty database with the full news schema
    pub async fn new() -> Self {
        Self::with_tables(&[AUTHORS_DDL, ARTICLES_DDL, LOG_DDL]).await
    }

    pub async fn with_tables(ddl: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("news.db");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create fixture database");
        for statement in ddl {
            sqlx::raw_sql(statement)
                .execute(&pool)
                .await
                .expect("Failed to create fixture table");
        }
        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    pub async fn store(&self) -> SqlStore {
        SqlStore::connect(&self.url())
            .await
            .expect("Failed to connect store")
    }

    pub async fn add_author(&self, id: i64, name: &str) {
        sqlx::query("INSERT INTO authors (id, name, bio) VALUES (?, ?, '')")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .expect("Failed to insert author");
    }

    pub async fn add_article(&self, author: i64, title: &str, slug: &str) {
        sqlx::query(
            "INSERT INTO articles (author, title, slug, lead, body, time) \
             VALUES (?, ?, ?, '', '', '2016-07-01 00:00:00')",
        )
        .bind(author)
        .bind(title)
        .bind(slug)
        .execute(&self.pool)
        .await
        .expect("Failed to insert article");
    }

    /// Insert `count` requests for `path` on `date` (YYYY-MM-DD) with `status`
    pub async fn add_requests(&self, path: &str, date: &str, status: &str, count: usize) {
        let mut tx = self.pool.begin().await.expect("Failed to begin");
        let time = format!("{date} 12:00:00");
        for _ in 0..count {
            sqlx::query(
                "INSERT INTO log (path, ip, method, status, time) \
                 VALUES (?, '198.51.100.7', 'GET', ?, ?)",
            )
            .bind(path)
            .bind(status)
            .bind(&time)
            .execute(&mut *tx)
            .await
            .expect("Failed to insert log row");
        }
        tx.commit().await.expect("Failed to commit");
    }

    /// Authors, articles and four days of traffic:
    ///
    /// - article views: candidate 50, bears 40, bad things 30, goats 30, lots of bears 5
    /// - 2016-07-01: 186 requests, 1 error (0.54%)
    /// - 2016-07-02: 100 requests, 2 errors (2.00%)
    /// - 2016-07-03: 100 requests, 1 error (exactly 1.00%)
    /// - 2016-07-04: 50 requests, 3 errors (6.00%)
    pub async fn seeded() -> Self {
        let db = Self::new().await;

        db.add_author(1, "Ursula La Multa").await;
        db.add_author(2, "Rudolf von Treppenwitz").await;
        db.add_author(3, "Anonymous Contributor").await;
        db.add_author(4, "Markoff Chaney").await;

        db.add_article(2, "Candidate is jerk, alleges rival", "candidate-is-jerk")
            .await;
        db.add_article(1, "Bears love berries, alleges bear", "bears-love-berries")
            .await;
        db.add_article(3, "Bad things gone, say good people", "bad-things-gone")
            .await;
        db.add_article(1, "Goats eat Google's lawn", "goats-eat-googles")
            .await;
        db.add_article(1, "There are a lot of bears", "so-many-bears")
            .await;

        let day1 = "2016-07-01";
        db.add_requests("/article/candidate-is-jerk", day1, OK, 50).await;
        db.add_requests("/article/bears-love-berries", day1, OK, 40).await;
        db.add_requests("/article/bad-things-gone", day1, OK, 30).await;
        db.add_requests("/article/goats-eat-googles", day1, OK, 30).await;
        db.add_requests("/article/so-many-bears", day1, OK, 5).await;
        db.add_requests("/", day1, OK, 20).await;
        // Paths that look like articles but match no slug exactly
        db.add_requests("/article/candidate-is-jerk-2", day1, OK, 6).await;
        db.add_requests("/article/no-such-article", day1, OK, 4).await;
        // A failed request for a real article is not a view
        db.add_requests("/article/candidate-is-jerk", day1, NOT_FOUND, 1)
            .await;

        let day2 = "2016-07-02";
        db.add_requests("/", day2, OK, 98).await;
        db.add_requests("/article/missing", day2, NOT_FOUND, 2).await;

        let day3 = "2016-07-03";
        db.add_requests("/", day3, OK, 99).await;
        db.add_requests("/article/missing", day3, NOT_FOUND, 1).await;

        let day4 = "2016-07-04";
        db.add_requests("/", day4, OK, 47).await;
        db.add_requests("/", day4, SERVER_ERROR, 3).await;

        db
    }
}
