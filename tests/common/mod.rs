//! In-memory doubles for the service's injected collaborators.
//!
//! Each double mirrors the contract of its Postgres counterpart behind a
//! `Mutex`-guarded map, and counts trait calls so tests can assert that
//! rejected requests never touch persistence.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use rideshare_service::db::{
    generate_session_token, PostRepository, ReportRepository, SessionStore, UserRepository,
};
use rideshare_service::error::{AppError, Result};
use rideshare_service::models::{NewPost, Post, Report, User};
use rideshare_service::services::{IdentityVerifier, Notifier, VerifiedIdentity};
use rideshare_service::AppState;

// ---------------------------------------------------------------------
// Users

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
    calls: Mutex<usize>,
}

impl InMemoryUsers {
    fn record_call(&self) {
        *self.calls.lock().unwrap() += 1;
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// Insert a user directly, bypassing the repository contract.
    pub fn seed(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, name: &str, email: &str) -> Result<User> {
        self.record_call();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phnum: None,
            banned: false,
            fcm_token: None,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.record_call();
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.record_call();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn set_phone_number(&self, id: Uuid, phnum: &str) -> Result<bool> {
        self.record_call();
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                user.phnum = Some(phnum.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_fcm_token(&self, id: Uuid, token: &str) -> Result<bool> {
        self.record_call();
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                user.fcm_token = Some(token.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn fcm_tokens(&self, ids: &[Uuid]) -> Result<Vec<String>> {
        self.record_call();
        let users = self.users.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).and_then(|u| u.fcm_token.clone()))
            .collect())
    }
}

// ---------------------------------------------------------------------
// Posts

#[derive(Default)]
pub struct InMemoryPosts {
    posts: Mutex<HashMap<Uuid, Post>>,
    calls: Mutex<usize>,
}

impl InMemoryPosts {
    fn record_call(&self) {
        *self.calls.lock().unwrap() += 1;
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn seed(&self, post: Post) {
        self.posts.lock().unwrap().insert(post.id, post);
    }

    pub fn get(&self, id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn create(&self, new_post: &NewPost) -> Result<Post> {
        self.record_call();
        let post = Post {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            depart_time: new_post.depart_time,
            start: new_post.start.clone(),
            dest: new_post.dest.clone(),
            memo: new_post.memo.clone(),
            driver_needed: new_post.driver_needed,
            driver: new_post.driver,
            uploader: new_post.uploader,
            passengers: new_post.passengers.clone(),
            total_seats: new_post.total_seats,
        };
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        self.record_call();
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Post>> {
        self.record_call();
        let mut posts: Vec<Post> = self.posts.lock().unwrap().values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn search(&self, start: &str, dest: &str) -> Result<Vec<Post>> {
        self.record_call();
        Ok(self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.start == start && p.dest == dest)
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        self.record_call();
        Ok(self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.involves(user_id))
            .cloned()
            .collect())
    }

    async fn replace(&self, post: &Post) -> Result<bool> {
        self.record_call();
        let mut posts = self.posts.lock().unwrap();
        match posts.get_mut(&post.id) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = post.clone();
                existing.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn try_add_passenger(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        self.record_call();
        let mut posts = self.posts.lock().unwrap();
        match posts.get_mut(&post_id) {
            Some(post)
                if post.driver.is_some()
                    && !post.passengers.contains(&user_id)
                    && (post.passengers.len() as i32) < post.total_seats =>
            {
                post.passengers.push(user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn try_assign_driver(&self, post_id: Uuid, user_id: Uuid, seats: i32) -> Result<bool> {
        self.record_call();
        let mut posts = self.posts.lock().unwrap();
        match posts.get_mut(&post_id) {
            Some(post) if post.driver.is_none() && (post.passengers.len() as i32) <= seats => {
                post.driver = Some(user_id);
                post.total_seats = seats;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------
// Reports

#[derive(Default)]
pub struct InMemoryReports {
    reports: Mutex<HashMap<Uuid, Report>>,
    calls: Mutex<usize>,
}

impl InMemoryReports {
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn get(&self, id: Uuid) -> Option<Report> {
        self.reports.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReports {
    async fn create(
        &self,
        reporter: Uuid,
        reported: &str,
        title: &str,
        body: &str,
    ) -> Result<Report> {
        *self.calls.lock().unwrap() += 1;
        let report = Report {
            id: Uuid::new_v4(),
            reporter,
            reported: reported.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        self.reports
            .lock()
            .unwrap()
            .insert(report.id, report.clone());
        Ok(report)
    }
}

// ---------------------------------------------------------------------
// Sessions

#[derive(Default)]
pub struct InMemorySessions {
    sessions: Mutex<HashMap<String, Uuid>>,
}

impl InMemorySessions {
    /// Establish a session directly, bypassing the login flow.
    pub fn seed(&self, user_id: Uuid) -> String {
        let token = generate_session_token();
        self.sessions.lock().unwrap().insert(token.clone(), user_id);
        token
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessions {
    async fn create(&self, user_id: Uuid) -> Result<String> {
        let token = generate_session_token();
        self.sessions.lock().unwrap().insert(token.clone(), user_id);
        Ok(token)
    }

    async fn find_user(&self, token: &str) -> Result<Option<Uuid>> {
        Ok(self.sessions.lock().unwrap().get(token).copied())
    }

    async fn destroy(&self, token: &str) -> Result<()> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }
}

// ---------------------------------------------------------------------
// Identity verifier

/// Verifier backed by a fixed token -> identity table.
#[derive(Default)]
pub struct StaticVerifier {
    identities: Mutex<HashMap<String, VerifiedIdentity>>,
    calls: Mutex<usize>,
}

impl StaticVerifier {
    pub fn accept(&self, token: &str, email: &str, name: &str) {
        self.identities.lock().unwrap().insert(
            token.to_string(),
            VerifiedIdentity {
                email: email.to_string(),
                name: name.to_string(),
            },
        );
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity> {
        *self.calls.lock().unwrap() += 1;
        self.identities
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Verification("identity provider rejected the token".into()))
    }
}

// ---------------------------------------------------------------------
// Notifier

/// Records every delivered notification as (token, title, body).
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, fcm_token: &str, title: &str, body: &str) -> Result<()> {
        self.sent.lock().unwrap().push((
            fcm_token.to_string(),
            title.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}

// ---------------------------------------------------------------------
// Harness

pub struct TestEnv {
    pub users: Arc<InMemoryUsers>,
    pub posts: Arc<InMemoryPosts>,
    pub reports: Arc<InMemoryReports>,
    pub sessions: Arc<InMemorySessions>,
    pub verifier: Arc<StaticVerifier>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUsers::default()),
            posts: Arc::new(InMemoryPosts::default()),
            reports: Arc::new(InMemoryReports::default()),
            sessions: Arc::new(InMemorySessions::default()),
            verifier: Arc::new(StaticVerifier::default()),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            users: self.users.clone(),
            posts: self.posts.clone(),
            reports: self.reports.clone(),
            sessions: self.sessions.clone(),
            verifier: self.verifier.clone(),
            notifier: self.notifier.clone(),
        }
    }

    /// Seed a registered user and an open session; returns (user_id, token).
    pub fn logged_in_user(&self, name: &str, email: &str) -> (Uuid, String) {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phnum: Some("831-555-0000".to_string()),
            banned: false,
            fcm_token: None,
            created_at: Utc::now(),
        };
        let user_id = user.id;
        self.users.seed(user);
        let token = self.sessions.seed(user_id);
        (user_id, token)
    }
}
