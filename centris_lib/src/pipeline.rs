//! The search pipeline: one session, one submitted query, paginated results.
//!
//! The backend keeps the active result set server-side. A search therefore
//! runs as a little protocol: submit the query payload, pull result pages by
//! number, and validate the first page against the query before trusting
//! anything, because a payload the backend no longer understands degrades
//! silently into a default search instead of an error.

use centris_api::types::QueryPayload;
use centris_api::{SearchQuery, Session};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::extract::{DetailExtractor, SummaryExtractor};
use crate::listing::{ListingRecord, ListingSummary};
use crate::validate::ResultValidator;

/// A property search pipeline bound to one portal session.
pub struct SearchPipeline {
    session: Session,
    config: PipelineConfig,
    summaries: SummaryExtractor,
    details: DetailExtractor,
    validator: ResultValidator,
}

impl SearchPipeline {
    /// Opens a session against the configured portal and prepares the
    /// extractors.
    pub async fn open(config: PipelineConfig) -> Result<Self, PipelineError> {
        let session = Session::open(config.session_config()).await?;
        let summaries = SummaryExtractor::new().with_base_url(&config.base_url);
        Ok(Self {
            session,
            summaries,
            details: DetailExtractor::new(),
            validator: ResultValidator::new(config.validation_threshold),
            config,
        })
    }

    /// The underlying session, for callers that need raw page fetches.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Submits the query and returns a pull-based stream of result pages,
    /// at most `max_pages` of them.
    ///
    /// Nothing is sent until the first call to [`PageStream::next`].
    pub fn search_with_pagination(&self, query: &SearchQuery, max_pages: u32) -> PageStream<'_> {
        PageStream {
            pipeline: self,
            payload: query.to_payload(),
            query: query.clone(),
            next_page: 1,
            max_pages,
            state: StreamState::Unsubmitted,
        }
    }

    /// Runs a search to completion and returns every summary it yielded.
    pub async fn collect_summaries(
        &self,
        query: &SearchQuery,
        max_pages: u32,
    ) -> Result<Vec<ListingSummary>, PipelineError> {
        let mut stream = self.search_with_pagination(query, max_pages);
        let mut summaries = Vec::new();
        while let Some(page) = stream.next().await? {
            summaries.extend(page.summaries);
        }
        Ok(summaries)
    }

    /// Fetches a detail page through the session and extracts its record.
    ///
    /// `url` may be page-relative, as found on summary cards. Returns
    /// `Ok(None)` when the page no longer carries a listing.
    pub async fn fetch_details(&self, url: &str) -> Result<Option<ListingRecord>, PipelineError> {
        let absolute = self.session.resolve(url);
        let html = self.session.fetch(&absolute).await?;
        Ok(self.details.extract(&html, &absolute))
    }

    /// Closes the underlying session.
    pub fn close(&self) {
        self.session.close();
    }
}

/// One page of search results.
#[derive(Clone, Debug)]
pub struct SummaryPage {
    /// Page number, starting at 1.
    pub page: u32,
    /// Cards extracted from the page, in page order.
    pub summaries: Vec<ListingSummary>,
    /// Total match count as reported by the page, when present.
    pub total_count: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum StreamState {
    Unsubmitted,
    Active,
    Done,
}

/// Pull-based stream over result pages.
///
/// The first `next` call submits the query, fetches page 1, and validates it
/// against the query; a page that does not look like the query fails with
/// [`PipelineError::ValidationRejected`] rather than feeding foreign
/// listings downstream. Later pages degrade gracefully: a transport failure
/// truncates the stream with a warning instead of erroring, since a partial
/// result set is still useful. Session-level failures stay fatal.
pub struct PageStream<'a> {
    pipeline: &'a SearchPipeline,
    query: SearchQuery,
    payload: QueryPayload,
    next_page: u32,
    max_pages: u32,
    state: StreamState,
}

impl PageStream<'_> {
    /// The next page, `Ok(None)` once the stream is exhausted.
    pub async fn next(&mut self) -> Result<Option<SummaryPage>, PipelineError> {
        match self.state {
            StreamState::Done => Ok(None),
            StreamState::Unsubmitted => self.first_page().await,
            StreamState::Active => self.following_page().await,
        }
    }

    async fn first_page(&mut self) -> Result<Option<SummaryPage>, PipelineError> {
        // Every early return below leaves the stream finished.
        self.state = StreamState::Done;
        if self.max_pages == 0 {
            return Ok(None);
        }

        self.pipeline.session.submit_query(&self.payload).await?;
        let html = self.pipeline.session.results_page(1).await?;
        let summaries = self.pipeline.summaries.extract(&html);
        if summaries.is_empty() {
            tracing::debug!("First result page has no listings");
            return Ok(None);
        }

        let verdict = self.pipeline.validator.validate(&summaries, &self.query);
        if !verdict.accepted {
            tracing::warn!(
                "First page rejected by validation (location {:.2}, category {:.2})",
                verdict.location_ratio,
                verdict.category_ratio
            );
            return Err(PipelineError::ValidationRejected(verdict));
        }

        let total_count = self.pipeline.summaries.result_count(&html);
        self.state = StreamState::Active;
        self.next_page = 2;
        Ok(Some(SummaryPage {
            page: 1,
            summaries,
            total_count,
        }))
    }

    async fn following_page(&mut self) -> Result<Option<SummaryPage>, PipelineError> {
        if self.next_page > self.max_pages {
            self.state = StreamState::Done;
            return Ok(None);
        }

        let delay = self.pipeline.config.page_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let page = self.next_page;
        let html = match self.pipeline.session.results_page(page).await {
            Ok(html) => html,
            Err(e) if e.is_transport() => {
                tracing::warn!("Truncating results at page {}: {}", page, e);
                self.state = StreamState::Done;
                return Ok(None);
            }
            Err(e) => {
                self.state = StreamState::Done;
                return Err(e.into());
            }
        };

        let summaries = self.pipeline.summaries.extract(&html);
        if summaries.is_empty() {
            tracing::debug!("Result page {} is empty, stopping", page);
            self.state = StreamState::Done;
            return Ok(None);
        }

        let total_count = self.pipeline.summaries.result_count(&html);
        self.next_page += 1;
        Ok(Some(SummaryPage {
            page,
            summaries,
            total_count,
        }))
    }
}
