//! Auto-waiting assertions
//!
//! An expectation re-reads the page every [`POLL_INTERVAL`] until the
//! condition holds or the expectation timeout elapses. On timeout it fails
//! with the last observed value, so reports show literal expected/actual
//! text. This is the page API's implicit wait; scenarios never retry on top.

use regex::Regex;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::page::Page;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What an expectation reads from the page
#[derive(Debug, Clone, Copy)]
enum Subject<'a> {
    Text(&'a str),
    Value(&'a str),
    Attribute(&'a str, &'a str),
    Visible(&'a str),
    Count(&'a str),
    Url,
    Title,
}

impl Subject<'_> {
    fn describe(&self) -> String {
        match self {
            Subject::Text(s) => format!("text of {}", s),
            Subject::Value(s) => format!("value of {}", s),
            Subject::Attribute(s, name) => format!("attribute '{}' of {}", name, s),
            Subject::Visible(s) => format!("visibility of {}", s),
            Subject::Count(s) => format!("count of {}", s),
            Subject::Url => "page URL".to_string(),
            Subject::Title => "page title".to_string(),
        }
    }

    async fn read(&self, page: &dyn Page) -> E2eResult<Option<String>> {
        match *self {
            Subject::Text(s) => Ok(page.text_content(s).await?.map(|t| t.trim().to_string())),
            Subject::Value(s) => page.input_value(s).await,
            Subject::Attribute(s, name) => page.attribute(s, name).await,
            Subject::Visible(s) => Ok(Some(page.is_visible(s).await?.to_string())),
            Subject::Count(s) => Ok(Some(page.count(s).await?.to_string())),
            Subject::Url => Ok(Some(page.url().await?)),
            Subject::Title => Ok(Some(page.title().await?)),
        }
    }
}

fn shown(observed: &Option<String>) -> String {
    match observed {
        Some(v) => format!("{:?}", v),
        None => "<no element>".to_string(),
    }
}

/// Assertions against one page, bounded by one timeout
pub struct Expect<'p> {
    page: &'p dyn Page,
    timeout: Duration,
}

impl<'p> Expect<'p> {
    pub fn new(page: &'p dyn Page, timeout: Duration) -> Self {
        Self { page, timeout }
    }

    async fn wait_until<F>(&self, subject: Subject<'_>, expected: &str, accept: F) -> E2eResult<()>
    where
        F: Fn(Option<&str>) -> bool,
    {
        let deadline = Instant::now() + self.timeout;

        loop {
            let observed = subject.read(self.page).await?;
            if accept(observed.as_deref()) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                debug!("Expectation on {} timed out", subject.describe());
                return Err(E2eError::assertion(subject.describe(), expected, shown(&observed)));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    pub async fn to_have_text(&self, selector: &str, expected: &str) -> E2eResult<()> {
        self.wait_until(Subject::Text(selector), &format!("{:?}", expected), |t| {
            t == Some(expected)
        })
        .await
    }

    pub async fn to_contain_text(&self, selector: &str, fragment: &str) -> E2eResult<()> {
        self.wait_until(
            Subject::Text(selector),
            &format!("text containing {:?}", fragment),
            |t| t.map(|t| t.contains(fragment)).unwrap_or(false),
        )
        .await
    }

    pub async fn to_have_value(&self, selector: &str, expected: &str) -> E2eResult<()> {
        self.wait_until(Subject::Value(selector), &format!("{:?}", expected), |v| {
            v == Some(expected)
        })
        .await
    }

    pub async fn to_have_attribute(
        &self,
        selector: &str,
        name: &str,
        expected: &str,
    ) -> E2eResult<()> {
        self.wait_until(
            Subject::Attribute(selector, name),
            &format!("{:?}", expected),
            |v| v == Some(expected),
        )
        .await
    }

    pub async fn to_be_visible(&self, selector: &str) -> E2eResult<()> {
        self.wait_until(Subject::Visible(selector), "visible", |v| v == Some("true"))
            .await
    }

    pub async fn not_to_be_visible(&self, selector: &str) -> E2eResult<()> {
        self.wait_until(Subject::Visible(selector), "hidden", |v| v == Some("false"))
            .await
    }

    pub async fn to_have_count(&self, selector: &str, expected: usize) -> E2eResult<()> {
        let expected = expected.to_string();
        self.wait_until(Subject::Count(selector), &expected, |c| c == Some(expected.as_str()))
            .await
    }

    pub async fn to_have_title(&self, expected: &str) -> E2eResult<()> {
        self.wait_until(Subject::Title, &format!("{:?}", expected), |t| t == Some(expected))
            .await
    }

    /// Exact URL match
    pub async fn to_have_url(&self, expected: &str) -> E2eResult<()> {
        self.wait_until(Subject::Url, &format!("{:?}", expected), |u| u == Some(expected))
            .await
    }

    pub async fn not_to_have_url(&self, unexpected: &str) -> E2eResult<()> {
        self.wait_until(Subject::Url, &format!("anything but {:?}", unexpected), |u| {
            u != Some(unexpected)
        })
        .await
    }

    pub async fn to_match_url(&self, pattern: &Regex) -> E2eResult<()> {
        self.wait_until(Subject::Url, &format!("match of /{}/", pattern), |u| {
            u.map(|u| pattern.is_match(u)).unwrap_or(false)
        })
        .await
    }
}
