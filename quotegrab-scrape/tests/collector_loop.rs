use anyhow::anyhow;
use quotegrab_common::{GrabError, RawQuote};
use quotegrab_scrape::collect::collect_quotes;
use quotegrab_scrape::session::QuoteSession;
use tokio_util::sync::CancellationToken;

/// Scripted session: a list of pages, each a list of raw quotes, with an
/// optional failure injected at a given page index.
struct FixtureSession {
    pages: Vec<Vec<RawQuote>>,
    current: usize,
    fail_page_quotes_at: Option<usize>,
    fail_advance_at: Option<usize>,
}

impl FixtureSession {
    fn new(pages: Vec<Vec<RawQuote>>) -> Self {
        Self {
            pages,
            current: 0,
            fail_page_quotes_at: None,
            fail_advance_at: None,
        }
    }
}

#[async_trait::async_trait]
impl QuoteSession for FixtureSession {
    async fn current_url(&mut self) -> anyhow::Result<String> {
        Ok(format!("fixture://quotes/page/{}", self.current + 1))
    }

    async fn page_quotes(&mut self) -> anyhow::Result<Vec<RawQuote>> {
        if self.fail_page_quotes_at == Some(self.current) {
            // The production session reports an expired wait this way.
            return Err(GrabError::Timeout.into());
        }
        Ok(self.pages.get(self.current).cloned().unwrap_or_default())
    }

    async fn advance(&mut self) -> anyhow::Result<bool> {
        if self.fail_advance_at == Some(self.current) {
            return Err(anyhow!("click failed"));
        }
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn quote(text: &str, author: &str, tags: &[&str]) -> RawQuote {
    RawQuote {
        text: Some(text.to_string()),
        author: Some(author.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
async fn two_page_fixture_yields_five_records_with_expected_pages() {
    let mut session = FixtureSession::new(vec![
        vec![
            quote("a", "Ana", &["x"]),
            quote("b", "Bea", &[]),
            quote("c", "Cid", &["y", "z"]),
        ],
        vec![quote("d", "Dan", &[]), quote("e", "Eva", &["w"])],
    ]);

    let records = collect_quotes(&mut session, &CancellationToken::new()).await;

    assert_eq!(records.len(), 5);
    let pages: Vec<u32> = records.iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 1, 1, 2, 2]);
    assert_eq!(records[4].author, "Eva");
    assert_eq!(records[2].tags, vec!["y".to_string(), "z".to_string()]);
}

#[tokio::test]
async fn page_numbers_are_non_decreasing_and_step_by_at_most_one() {
    let mut session = FixtureSession::new(vec![
        vec![quote("a", "Ana", &[]); 2],
        vec![quote("b", "Bea", &[]); 3],
        vec![quote("c", "Cid", &[]); 1],
    ]);

    let records = collect_quotes(&mut session, &CancellationToken::new()).await;

    for pair in records.windows(2) {
        assert!(pair[1].page >= pair[0].page);
        assert!(pair[1].page - pair[0].page <= 1);
    }
}

#[tokio::test]
async fn missing_field_skips_only_that_quote() {
    let broken = RawQuote {
        text: Some("orphan".into()),
        author: None,
        tags: vec![],
    };
    let mut session = FixtureSession::new(vec![vec![
        quote("a", "Ana", &[]),
        broken,
        quote("c", "Cid", &[]),
    ]]);

    let records = collect_quotes(&mut session, &CancellationToken::new()).await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].author, "Ana");
    assert_eq!(records[1].author, "Cid");
}

#[tokio::test]
async fn empty_page_terminates_and_keeps_prior_records() {
    let mut session = FixtureSession::new(vec![vec![quote("a", "Ana", &[])], vec![]]);

    let records = collect_quotes(&mut session, &CancellationToken::new()).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].page, 1);
}

#[tokio::test]
async fn page_wait_timeout_keeps_partial_results() {
    let mut session = FixtureSession::new(vec![
        vec![quote("a", "Ana", &[])],
        vec![quote("b", "Bea", &[])],
    ]);
    session.fail_page_quotes_at = Some(1);

    let records = collect_quotes(&mut session, &CancellationToken::new()).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].page, 1);
}

#[tokio::test]
async fn navigation_failure_keeps_partial_results() {
    let mut session = FixtureSession::new(vec![
        vec![quote("a", "Ana", &[])],
        vec![quote("b", "Bea", &[])],
    ]);
    session.fail_advance_at = Some(0);

    let records = collect_quotes(&mut session, &CancellationToken::new()).await;

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn cancelled_token_stops_before_scraping() {
    let mut session = FixtureSession::new(vec![vec![quote("a", "Ana", &[])]]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let records = collect_quotes(&mut session, &cancel).await;

    assert!(records.is_empty());
}
