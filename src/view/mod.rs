//! Per-page view state: check the session, then load the page's sections.
//!
//! Each request owns its controller; nothing is shared across pages. A page
//! whose session is missing or not a supervisor redirects to the login entry
//! point without touching any data.

mod assets;
mod critical_problems;
mod dashboard;
mod heatmap;
mod hour_meters;
mod operators;
mod reports;

pub use assets::*;
pub use critical_problems::*;
pub use dashboard::*;
pub use heatmap::*;
pub use hour_meters::*;
pub use operators::*;
pub use reports::*;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::UserAccount;
use crate::repository::Repository;

/// Lifecycle of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PagePhase {
    Unauthenticated,
    Authenticating,
    Redirected,
    Loading,
    Ready,
}

impl PagePhase {
    pub fn can_transition(self, next: PagePhase) -> bool {
        matches!(
            (self, next),
            (PagePhase::Unauthenticated, PagePhase::Authenticating)
                | (PagePhase::Authenticating, PagePhase::Redirected)
                | (PagePhase::Authenticating, PagePhase::Loading)
                | (PagePhase::Loading, PagePhase::Ready)
                | (PagePhase::Ready, PagePhase::Loading)
        )
    }
}

/// A verified supervisor session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserAccount,
}

/// Why a page did not reach `Ready`.
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    /// Send the browser to the login entry point
    Redirect(String),
    Failed(AppError),
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError::Failed(err)
    }
}

/// Records which sections fell back to their empty state.
#[derive(Debug, Default)]
pub struct Degraded {
    sections: Vec<&'static str>,
}

impl Degraded {
    /// Unwrap a section result, substituting the empty value on failure.
    pub fn take<T: Default>(&mut self, section: &'static str, result: Result<T, AppError>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(section, error = %e, "Section unavailable, showing empty state");
                self.sections.push(section);
                T::default()
            }
        }
    }

    pub fn into_sections(self) -> Vec<&'static str> {
        self.sections
    }
}

/// A dashboard page: what it is filtered by and what it loads.
#[async_trait]
pub trait Page: Send + Sync {
    type Filters: Send + Sync;
    type Data: Send;

    const NAME: &'static str;

    /// Fetch every section of the page. Sections are fetched concurrently and
    /// joined; failures degrade to empty sections.
    async fn load(&self, repo: &Repository, session: &Session, filters: &Self::Filters)
        -> Self::Data;
}

/// Runs the auth-check-then-load sequence for one page.
pub struct PageController<P: Page> {
    page: P,
    repo: Repository,
    login_path: String,
    phase: PagePhase,
    session: Option<Session>,
    data: Option<P::Data>,
}

impl<P: Page> PageController<P> {
    pub fn new(page: P, repo: Repository, login_path: impl Into<String>) -> Self {
        Self {
            page,
            repo,
            login_path: login_path.into(),
            phase: PagePhase::Unauthenticated,
            session: None,
            data: None,
        }
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    pub fn data(&self) -> Option<&P::Data> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<P::Data> {
        self.data
    }

    fn advance(&mut self, next: PagePhase) -> Result<(), AppError> {
        if !self.phase.can_transition(next) {
            return Err(AppError::Internal(format!(
                "Page {} cannot go from {:?} to {:?}",
                P::NAME,
                self.phase,
                next
            )));
        }
        self.phase = next;
        Ok(())
    }

    fn redirect(&mut self, reason: &str) -> Result<(), PageError> {
        tracing::debug!(page = P::NAME, reason, "Redirecting to login");
        self.advance(PagePhase::Redirected)?;
        Err(PageError::Redirect(self.login_path.clone()))
    }

    /// Verify the session, then load the page.
    pub async fn mount(&mut self, token: Option<&str>, filters: &P::Filters) -> Result<(), PageError> {
        self.authorize(token).await?;
        self.load(filters).await?;
        Ok(())
    }

    /// Verify the session without loading anything.
    ///
    /// Request parameters are only looked at once this has succeeded, so an
    /// unauthorized caller always gets the redirect.
    pub async fn authorize(&mut self, token: Option<&str>) -> Result<(), PageError> {
        self.advance(PagePhase::Authenticating)?;

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return self.redirect("no session");
        };

        let user = match self.repo.current_user(token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!(page = P::NAME, error = %e, "Session check failed");
                return self.redirect("session not resolved");
            }
        };
        if !user.is_supervisor() {
            return self.redirect("not a supervisor");
        }

        self.session = Some(Session {
            token: token.to_string(),
            user,
        });
        Ok(())
    }

    /// Load after [`authorize`](Self::authorize), or re-fetch after a filter
    /// change or a mutation.
    pub async fn reload(&mut self, filters: &P::Filters) -> Result<(), AppError> {
        self.load(filters).await
    }

    async fn load(&mut self, filters: &P::Filters) -> Result<(), AppError> {
        self.advance(PagePhase::Loading)?;
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| AppError::Internal(format!("Page {} has no session", P::NAME)))?;

        tracing::debug!(page = P::NAME, "Loading page");
        let data = self.page.load(&self.repo, session, filters).await;
        self.data = Some(data);
        self.advance(PagePhase::Ready)
    }
}
