use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::PostRepository;
use crate::error::Result;
use crate::models::{NewPost, Post};

const POST_COLUMNS: &str = "id, created_at, depart_time, start_loc, dest_loc, memo, \
                            driver_needed, driver, uploader, passengers, total_seats";

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (id, depart_time, start_loc, dest_loc, memo,
                               driver_needed, driver, uploader, passengers, total_seats)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new_post.depart_time)
        .bind(&new_post.start)
        .bind(&new_post.dest)
        .bind(&new_post.memo)
        .bind(new_post.driver_needed)
        .bind(new_post.driver)
        .bind(new_post.uploader)
        .bind(&new_post.passengers)
        .bind(new_post.total_seats)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_all(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn search(&self, start: &str, dest: &str) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE start_loc = $1 AND dest_loc = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(start)
        .bind(dest)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE uploader = $1 OR driver = $1 OR $1 = ANY(passengers)
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn replace(&self, post: &Post) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET depart_time = $2, start_loc = $3, dest_loc = $4, memo = $5,
                driver_needed = $6, driver = $7, uploader = $8, passengers = $9,
                total_seats = $10
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(post.depart_time)
        .bind(&post.start)
        .bind(&post.dest)
        .bind(&post.memo)
        .bind(post.driver_needed)
        .bind(post.driver)
        .bind(post.uploader)
        .bind(&post.passengers)
        .bind(post.total_seats)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn try_add_passenger(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        // Single conditional update so two riders racing for the last
        // seat cannot both get it.
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET passengers = array_append(passengers, $2)
            WHERE id = $1
              AND driver IS NOT NULL
              AND NOT (passengers @> ARRAY[$2])
              AND cardinality(passengers) < total_seats
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn try_assign_driver(&self, post_id: Uuid, user_id: Uuid, seats: i32) -> Result<bool> {
        // The offered capacity must cover everyone already aboard.
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET driver = $2, total_seats = $3
            WHERE id = $1
              AND driver IS NULL
              AND cardinality(passengers) <= $3
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(seats)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
