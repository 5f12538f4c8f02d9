use std::sync::Arc;

use chrono::NaiveDate;
use dailywall::application::services::{DedupeStore, Fetcher};
use dailywall::domain::repositories::WallpaperRepository;
use dailywall::domain::wallpapers::{Market, NewWallpaper};
use dailywall::infrastructure::database::Database;
use dailywall::infrastructure::image_archive::ImageArchiveClient;
use dailywall::infrastructure::repositories::SqlWallpaperRepository;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestIngest {
    pub upstream: MockServer,
    pub repo: Arc<dyn WallpaperRepository>,
    pub fetcher: Fetcher,
}

pub async fn sql_repo() -> SqlWallpaperRepository {
    let database = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    SqlWallpaperRepository::new(database.clone_pool())
}

pub async fn spawn_ingest() -> TestIngest {
    let upstream = MockServer::start().await;
    let repo: Arc<dyn WallpaperRepository> = Arc::new(sql_repo().await);
    let store = DedupeStore::new(repo.clone());
    let archive = ImageArchiveClient::new(&upstream.uri()).expect("valid upstream URL");
    let fetcher = Fetcher::new(archive, store);

    TestIngest {
        upstream,
        repo,
        fetcher,
    }
}

pub fn market(code: &str) -> Market {
    Market::parse(code).expect("valid market")
}

pub fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
}

pub fn archive_body(title: &str) -> serde_json::Value {
    json!({
        "images": [{
            "startdate": "20240219",
            "fullstartdate": "202402191600",
            "enddate": "20240220",
            "url": format!("/th?id=OHR.{title}_EN-US4417_1920x1080.jpg&rf=LaDigue_1920x1080.jpg&pid=hp"),
            "urlbase": format!("/th?id=OHR.{title}_EN-US4417"),
            "copyright": format!("{title} (© Someone/Getty Images)"),
            "copyrightlink": "https://www.bing.com/search?q=wallpaper",
            "title": title,
            "hsh": format!("hsh-{title}")
        }],
        "tooltips": {"loading": "Loading..."}
    })
}

/// Answer archive requests for `mkt` with `template`.
pub async fn mock_market(upstream: &MockServer, mkt: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/HPImageArchive.aspx"))
        .and(query_param("format", "js"))
        .and(query_param("n", "1"))
        .and(query_param("mkt", mkt))
        .respond_with(template)
        .mount(upstream)
        .await;
}

pub fn candidate(date: &str, mkt: &str, title: &str) -> NewWallpaper {
    NewWallpaper {
        title: title.to_string(),
        image_url: format!("https://www.bing.com/th?id=OHR.{title}_1920x1080.jpg"),
        date: day(date),
        copyright: String::new(),
        copyright_link: String::new(),
        image_hash: format!("hsh-{title}"),
        created_at: day(date),
        market: market(mkt),
    }
}
