//! Fleet report scraping
//!
//! Fetches the newest fleet tracker post over plain HTTP, pulls its
//! paragraphs out of the HTML and turns ship mentions into records.

use std::sync::LazyLock;

use chrono::Local;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

use crate::{
    config::ScraperConfig,
    database::Database,
    errors::FleetTrackerError,
    extract::mentions,
    hull::classify,
    models::ScrapedShipRecord,
    status::normalize,
};

static LATEST_POST_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.title56 a[href]").unwrap());
static POST_BODIES: LazyLock<[Selector; 2]> = LazyLock::new(|| {
    [
        Selector::parse("div.entry-content").unwrap(),
        Selector::parse("div.td-post-content").unwrap(),
    ]
});
static POST_DATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time.entry-date").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Text content of one fleet tracker post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetReport {
    /// Publication date as printed on the page
    pub published: Option<String>,
    pub paragraphs: Vec<String>,
}

/// Find the link to the newest post on the category page
pub fn latest_report_url(category_html: &str, base: &str) -> Result<String, FleetTrackerError> {
    let document = Html::parse_document(category_html);
    let href = document
        .select(&LATEST_POST_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| FleetTrackerError::MissingElement("latest article link".to_string()))?;

    let base = Url::parse(base).map_err(|e| FleetTrackerError::InvalidUrl(e.to_string()))?;
    let url = base
        .join(href)
        .map_err(|e| FleetTrackerError::InvalidUrl(e.to_string()))?;
    Ok(url.to_string())
}

/// Extract date and paragraphs from a post page
pub fn parse_report(post_html: &str) -> Result<FleetReport, FleetTrackerError> {
    let document = Html::parse_document(post_html);

    let body = POST_BODIES
        .iter()
        .find_map(|selector| document.select(selector).next())
        .ok_or_else(|| {
            FleetTrackerError::MissingElement(
                "content div ('entry-content' or 'td-post-content')".to_string(),
            )
        })?;

    let published = document
        .select(&POST_DATE)
        .next()
        .map(|time| time.text().collect::<String>().trim().to_string())
        .filter(|date| !date.is_empty());

    let paragraphs = body
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect();

    Ok(FleetReport {
        published,
        paragraphs,
    })
}

/// Turn every ship mention in the report into a record.
///
/// Records are dated with the post's publication date, or `today` when the
/// page shows none.
pub fn collect_ships(report: &FleetReport, today: &str) -> Vec<ScrapedShipRecord> {
    let reported = report.published.as_deref().unwrap_or(today);

    report
        .paragraphs
        .iter()
        .flat_map(|paragraph| mentions(paragraph))
        .map(|mention| ScrapedShipRecord {
            name: mention.full_name(),
            ship_class: classify(&mention.hull).to_string(),
            status: normalize(&mention.raw_status),
            location_reported: reported.to_string(),
            hull: mention.hull,
        })
        .collect()
}

/// HTTP client for the fleet tracker pages
pub struct FleetScraper {
    client: reqwest::Client,
    config: ScraperConfig,
}

impl FleetScraper {
    pub fn new(config: ScraperConfig) -> Result<Self, FleetTrackerError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String, FleetTrackerError> {
        info!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FleetTrackerError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch and parse the newest fleet report
    pub async fn fetch_latest_report(&self) -> Result<FleetReport, FleetTrackerError> {
        let category = self.fetch_page(&self.config.category_url).await?;
        let post_url = latest_report_url(&category, &self.config.category_url)?;
        info!("Found latest post URL: {}", post_url);

        let post = self.fetch_page(&post_url).await?;
        match parse_report(&post) {
            Ok(report) => Ok(report),
            Err(e) => {
                if let Some(path) = &self.config.debug_dump_path {
                    tokio::fs::write(path, &post).await?;
                    warn!("Saved unparseable post page to {}", path.display());
                }
                Err(e)
            }
        }
    }

    /// Scrape the newest report into ship records
    pub async fn scrape(&self) -> Result<Vec<ScrapedShipRecord>, FleetTrackerError> {
        let report = self.fetch_latest_report().await?;
        let today = Local::now().format("%B %d, %Y").to_string();
        if let Some(date) = &report.published {
            info!("Found fleet data from: {}", date);
        }
        Ok(collect_ships(&report, &today))
    }
}

/// Scrape once and replace the stored batch.
///
/// Returns the number of stored ships. An empty scrape leaves the store
/// untouched; any error aborts before the store is modified.
pub async fn scrape_and_store(
    scraper: &FleetScraper,
    database: &Database,
) -> Result<usize, FleetTrackerError> {
    let ships = scraper.scrape().await?;
    store_batch(database, &ships).await
}

/// Replace the stored batch unless `ships` is empty
pub async fn store_batch(
    database: &Database,
    ships: &[ScrapedShipRecord],
) -> Result<usize, FleetTrackerError> {
    if ships.is_empty() {
        warn!("No ships parsed. Text format may have changed or no ships listed in the usual format");
        return Ok(0);
    }

    info!("Successfully scraped {} ships, updating database", ships.len());
    database.replace_ships(ships).await?;
    Ok(ships.len())
}
