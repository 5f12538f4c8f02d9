use dailywall::application::errors::IngestError;
use dailywall::domain::ids::WallpaperId;
use dailywall::domain::wallpapers::{IngestOutcome, WallpaperFilter, WallpaperSort};
use dailywall::infrastructure::image_archive::ImageArchiveClient;
use wiremock::ResponseTemplate;

use crate::helpers::{archive_body, day, market, mock_market, spawn_ingest};

#[tokio::test]
async fn new_wallpaper_is_stored_with_absolute_url() {
    let ingest = spawn_ingest().await;
    mock_market(
        &ingest.upstream,
        "en-US",
        ResponseTemplate::new(200).set_body_json(archive_body("Lighthouse")),
    )
    .await;

    let outcome = ingest
        .fetcher
        .fetch_market(&market("en-US"), day("2024-02-19"))
        .await
        .expect("fetch succeeds");

    let IngestOutcome::Inserted(wallpaper) = outcome else {
        panic!("expected an insert, got {outcome:?}");
    };
    assert_eq!(wallpaper.id, WallpaperId::FIRST);
    assert_eq!(wallpaper.title, "Lighthouse");
    assert_eq!(wallpaper.date, day("2024-02-19"));
    assert_eq!(wallpaper.created_at, day("2024-02-19"));
    assert_eq!(wallpaper.market, market("en-US"));
    assert_eq!(wallpaper.image_hash, "hsh-Lighthouse");
    assert_eq!(
        wallpaper.image_url,
        format!(
            "{}/th?id=OHR.Lighthouse_EN-US4417_1920x1080.jpg&rf=LaDigue_1920x1080.jpg&pid=hp",
            ingest.upstream.uri()
        )
    );

    let stored = ingest
        .repo
        .find_one(&WallpaperFilter::all(), WallpaperSort::IdAsc, 0)
        .await
        .unwrap();
    assert_eq!(stored, wallpaper);
}

#[tokio::test]
async fn same_day_refetch_is_skipped_and_next_day_gets_next_id() {
    let ingest = spawn_ingest().await;
    mock_market(
        &ingest.upstream,
        "en-US",
        ResponseTemplate::new(200).set_body_json(archive_body("Lighthouse")),
    )
    .await;
    let en_us = market("en-US");

    let first = ingest
        .fetcher
        .fetch_market(&en_us, day("2024-02-19"))
        .await
        .unwrap();
    assert!(first.is_inserted());

    let second = ingest
        .fetcher
        .fetch_market(&en_us, day("2024-02-20"))
        .await
        .unwrap();
    let IngestOutcome::Inserted(second) = second else {
        panic!("expected an insert for a new day");
    };
    assert_eq!(second.id, WallpaperId::new(2));

    let third = ingest
        .fetcher
        .fetch_market(&en_us, day("2024-02-20"))
        .await
        .unwrap();
    assert_eq!(
        third,
        IngestOutcome::Skipped {
            existing: WallpaperId::new(2)
        }
    );

    assert_eq!(ingest.repo.count(&WallpaperFilter::all()).await.unwrap(), 2);
}

#[tokio::test]
async fn empty_images_array_stores_nothing() {
    let ingest = spawn_ingest().await;
    mock_market(
        &ingest.upstream,
        "en-US",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"images": []})),
    )
    .await;

    let err = ingest
        .fetcher
        .fetch_market(&market("en-US"), day("2024-02-19"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::EmptyResponse));
    assert_eq!(ingest.repo.count(&WallpaperFilter::all()).await.unwrap(), 0);
}

#[tokio::test]
async fn non_200_status_is_reported() {
    let ingest = spawn_ingest().await;
    mock_market(&ingest.upstream, "en-US", ResponseTemplate::new(503)).await;

    let err = ingest
        .fetcher
        .fetch_market(&market("en-US"), day("2024-02-19"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::UnexpectedStatus(503)));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let ingest = spawn_ingest().await;
    mock_market(
        &ingest.upstream,
        "en-US",
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let err = ingest
        .fetcher
        .fetch_market(&market("en-US"), day("2024-02-19"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Parse(_)));
}

#[tokio::test]
async fn entry_without_title_is_rejected() {
    let ingest = spawn_ingest().await;
    mock_market(
        &ingest.upstream,
        "en-US",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "images": [{"url": "/th?id=OHR.NoTitle_1920x1080.jpg", "hsh": "x"}]
        })),
    )
    .await;

    let err = ingest
        .fetcher
        .fetch_market(&market("en-US"), day("2024-02-19"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::InvalidEntry(_)));
    assert_eq!(ingest.repo.count(&WallpaperFilter::all()).await.unwrap(), 0);
}

#[tokio::test]
async fn run_continues_past_failing_market() {
    let ingest = spawn_ingest().await;
    mock_market(
        &ingest.upstream,
        "en-US",
        ResponseTemplate::new(200).set_body_json(archive_body("America")),
    )
    .await;
    mock_market(&ingest.upstream, "de-DE", ResponseTemplate::new(500)).await;
    mock_market(
        &ingest.upstream,
        "ja-JP",
        ResponseTemplate::new(200).set_body_json(archive_body("Japan")),
    )
    .await;

    let markets = [market("en-US"), market("de-DE"), market("ja-JP")];
    let report = ingest.fetcher.run(&markets, day("2024-02-19")).await;

    assert!(report.has_failures());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].market, market("de-DE"));
    let inserted: Vec<(String, i64)> = report
        .inserted
        .iter()
        .map(|m| (m.market.to_string(), m.id.into_inner()))
        .collect();
    assert_eq!(
        inserted,
        vec![("en-US".to_string(), 1), ("ja-JP".to_string(), 2)]
    );

    let rerun = ingest.fetcher.run(&markets, day("2024-02-19")).await;
    assert!(rerun.inserted.is_empty());
    assert_eq!(rerun.skipped, vec![market("en-US"), market("ja-JP")]);
    assert_eq!(rerun.failed.len(), 1);
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", closed.local_addr().unwrap());
    drop(closed);

    let archive = ImageArchiveClient::new(&uri).unwrap();
    let err = archive.fetch_latest(&market("en-US")).await.unwrap_err();
    assert!(matches!(err, IngestError::Transport(_)));
}
