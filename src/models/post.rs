use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A ride offer/request.
///
/// `driver` and `passengers` hold weak references to user ids. The seat
/// invariant (`passengers.len() <= total_seats`, driver assigned before
/// passengers join) is enforced by the storage layer through conditional
/// updates; see `PostRepository`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub depart_time: DateTime<Utc>,
    #[sqlx(rename = "start_loc")]
    pub start: String,
    #[sqlx(rename = "dest_loc")]
    pub dest: String,
    pub memo: String,
    pub driver_needed: bool,
    pub driver: Option<Uuid>,
    pub uploader: Uuid,
    pub passengers: Vec<Uuid>,
    pub total_seats: i32,
}

impl Post {
    /// Whether a user occupies any slot on this post or uploaded it.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.uploader == user_id
            || self.driver == Some(user_id)
            || self.passengers.contains(&user_id)
    }
}

/// A post as submitted by a client, before the server assigns id and
/// creation time.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub depart_time: DateTime<Utc>,
    pub start: String,
    pub dest: String,
    pub memo: String,
    pub driver_needed: bool,
    pub driver: Option<Uuid>,
    pub uploader: Uuid,
    pub passengers: Vec<Uuid>,
    pub total_seats: i32,
}

impl NewPost {
    /// Build a post from a client submission.
    ///
    /// The uploader is always the authenticated caller, never a value
    /// taken from the request body. If the uploader still needs a driver
    /// they are put on the passenger list; otherwise they are the driver
    /// and the submitted passenger list is kept as-is.
    #[allow(clippy::too_many_arguments)]
    pub fn from_submission(
        uploader: Uuid,
        depart_time: DateTime<Utc>,
        start: String,
        dest: String,
        memo: String,
        driver_needed: bool,
        mut passengers: Vec<Uuid>,
        total_seats: i32,
    ) -> Self {
        let driver = if driver_needed {
            passengers.push(uploader);
            None
        } else {
            Some(uploader)
        };

        NewPost {
            depart_time,
            start,
            dest,
            memo,
            driver_needed,
            driver,
            uploader,
            passengers,
            total_seats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(uploader: Uuid, driver_needed: bool, passengers: Vec<Uuid>) -> NewPost {
        NewPost::from_submission(
            uploader,
            Utc::now(),
            "Santa Cruz".into(),
            "San Jose".into(),
            "weekly ride".into(),
            driver_needed,
            passengers,
            3,
        )
    }

    #[test]
    fn uploader_needing_driver_joins_passengers() {
        let uploader = Uuid::new_v4();
        let post = submission(uploader, true, vec![]);

        assert_eq!(post.driver, None);
        assert_eq!(post.passengers, vec![uploader]);
        assert_eq!(post.uploader, uploader);
    }

    #[test]
    fn uploader_driving_keeps_submitted_passenger_list() {
        let uploader = Uuid::new_v4();
        let rider = Uuid::new_v4();
        let post = submission(uploader, false, vec![rider]);

        assert_eq!(post.driver, Some(uploader));
        assert_eq!(post.passengers, vec![rider]);
    }

    #[test]
    fn involves_matches_every_slot() {
        let uploader = Uuid::new_v4();
        let driver = Uuid::new_v4();
        let rider = Uuid::new_v4();
        let outsider = Uuid::new_v4();

        let post = Post {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            depart_time: Utc::now(),
            start: "a".into(),
            dest: "b".into(),
            memo: String::new(),
            driver_needed: false,
            driver: Some(driver),
            uploader,
            passengers: vec![rider],
            total_seats: 4,
        };

        assert!(post.involves(uploader));
        assert!(post.involves(driver));
        assert!(post.involves(rider));
        assert!(!post.involves(outsider));
    }
}
