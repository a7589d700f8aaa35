use std::sync::Arc;
use uuid::Uuid;

use crate::db::{PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{NewPost, Post};
use crate::services::Notifier;

/// Post lifecycle: creation, slot assignment, full replacement, and the
/// post-update notification fan-out.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            posts,
            users,
            notifier,
        }
    }

    pub async fn create(&self, new_post: NewPost) -> Result<Post> {
        // Holds the seat invariant from the moment the post exists, not
        // just on later joins.
        if new_post.passengers.len() as i32 > new_post.total_seats {
            return Err(AppError::Validation(
                "passenger list exceeds the seat count".into(),
            ));
        }

        self.posts.create(&new_post).await
    }

    /// Join a post as a passenger.
    ///
    /// The storage layer applies the join as one conditional update; when
    /// that does not take effect, the post is re-read only to report which
    /// precondition failed.
    pub async fn add_passenger(&self, caller: Uuid, post_id: Uuid) -> Result<()> {
        if self.posts.try_add_passenger(post_id, caller).await? {
            return Ok(());
        }

        match self.posts.find_by_id(post_id).await? {
            None => Err(AppError::NotFound("post not found".into())),
            Some(post) if post.driver.is_none() => {
                Err(AppError::Conflict("post has no driver yet".into()))
            }
            Some(post) if post.passengers.contains(&caller) => {
                Err(AppError::Conflict("already a passenger on this post".into()))
            }
            Some(post) if post.passengers.len() as i32 >= post.total_seats => {
                Err(AppError::Conflict("no free seats left".into()))
            }
            // Lost a race with a concurrent mutation between the update
            // and the re-read.
            Some(_) => Err(AppError::Conflict("seat assignment failed".into())),
        }
    }

    /// Volunteer as the driver, declaring how many seats are offered.
    pub async fn add_driver(&self, caller: Uuid, post_id: Uuid, avail: i32) -> Result<()> {
        if self.posts.try_assign_driver(post_id, caller, avail).await? {
            return Ok(());
        }

        match self.posts.find_by_id(post_id).await? {
            None => Err(AppError::NotFound("post not found".into())),
            Some(post) if post.driver.is_some() => {
                Err(AppError::Conflict("driver already assigned".into()))
            }
            Some(post) if post.passengers.len() as i32 > avail => Err(AppError::Conflict(
                "fewer seats offered than passengers aboard".into(),
            )),
            Some(_) => Err(AppError::Conflict("driver assignment failed".into())),
        }
    }

    /// Replace the stored post wholesale, then notify every other
    /// participant. The fan-out runs on its own task and cannot fail the
    /// request that triggered it.
    pub async fn replace(&self, caller: Uuid, post: Post) -> Result<()> {
        if !self.posts.replace(&post).await? {
            return Err(AppError::NotFound("post not found".into()));
        }

        let recipients = participants_except(&post, caller);
        if recipients.is_empty() {
            return Ok(());
        }

        let users = Arc::clone(&self.users);
        let notifier = Arc::clone(&self.notifier);
        let post_id = post.id;
        let title = "Ride updated".to_string();
        let body = format!("The ride from {} to {} has changed", post.start, post.dest);

        tokio::spawn(async move {
            let tokens = match users.fcm_tokens(&recipients).await {
                Ok(tokens) => tokens,
                Err(e) => {
                    tracing::warn!(%post_id, "token lookup for fan-out failed: {e}");
                    return;
                }
            };

            for token in tokens {
                if let Err(e) = notifier.send(&token, &title, &body).await {
                    tracing::warn!(%post_id, "push delivery failed: {e}");
                }
            }
        });

        Ok(())
    }
}

/// Everyone with a stake in the post (uploader, driver, passengers),
/// deduplicated, minus the user who made the change.
fn participants_except(post: &Post, excluded: Uuid) -> Vec<Uuid> {
    let mut recipients = Vec::with_capacity(post.passengers.len() + 2);

    let mut push = |id: Uuid| {
        if id != excluded && !recipients.contains(&id) {
            recipients.push(id);
        }
    };

    push(post.uploader);
    if let Some(driver) = post.driver {
        push(driver);
    }
    for &passenger in &post.passengers {
        push(passenger);
    }

    recipients
}
