//! Meta endpoint integration tests.

mod common;

use akwam_common::ids::encode;
use common::{get_json, listing_page, movie_page, series_page, StaticFetcher, TestHarness, BASE};

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn movie_meta_is_enriched() {
    let url = "https://ak.sv/movie/2/dune";
    let fetcher = StaticFetcher::new().page(url, &movie_page("Dune"));
    let (_h, addr) = TestHarness::with_server(fetcher).await;

    let token = encode("Dune", Some(url));
    let (status, json) = get_json(addr, &format!("/meta/movie/{token}.json")).await;
    assert_eq!(status, 200);

    let meta = &json["meta"];
    assert_eq!(meta["id"], token.as_str());
    assert_eq!(meta["type"], "movie");
    assert_eq!(meta["name"], "Dune");
    assert_eq!(meta["description"], "رحلة طويلة. نهاية سعيدة.");
    assert_eq!(meta["poster"], "https://img.downet.net/uploads/poster.jpg");
    assert_eq!(meta["background"], meta["poster"]);
    assert_eq!(meta["year"], "2021");
    assert_eq!(meta["genres"], serde_json::json!(["مغامرة"]));
    assert_eq!(meta["cast"], serde_json::json!([]));
    assert_eq!(meta["imdbRating"], "10");
    assert!(meta.get("videos").is_none());
}

#[tokio::test]
async fn unreachable_entry_falls_back_to_defaults() {
    let (_h, addr) = TestHarness::with_server(StaticFetcher::new()).await;

    let token = encode("Lost Film", Some("https://ak.sv/movie/404/lost"));
    let (status, json) = get_json(addr, &format!("/meta/movie/{token}.json")).await;
    assert_eq!(status, 200);

    let meta = &json["meta"];
    assert_eq!(meta["name"], "Lost Film");
    assert_eq!(meta["description"], "Watch Lost Film on Akwam.");
    assert_eq!(meta["imdbRating"], "N/A");
    assert_eq!(meta["cast"], serde_json::json!([]));
    assert_eq!(meta["genres"], serde_json::json!([]));
}

#[tokio::test]
async fn legacy_title_only_id_uses_first_search_hit() {
    let fetcher = StaticFetcher::new()
        .page(
            &format!("{BASE}/search?q=Dune&section=movie&page=1"),
            &listing_page(&[
                ("Dune", "https://ak.sv/movie/2/dune", "2021"),
                ("Dune 1984", "https://ak.sv/movie/1/dune-1984", "1984"),
            ]),
        )
        .page("https://ak.sv/movie/2/dune", &movie_page("Dune"));
    let (_h, addr) = TestHarness::with_server(fetcher).await;

    // Legacy deployments minted standard, padded base64 of the title alone.
    let (status, json) = get_json(addr, "/meta/movie/akwamRHVuZQ==.json").await;
    assert_eq!(status, 200);
    assert_eq!(json["meta"]["name"], "Dune");
    assert_eq!(json["meta"]["year"], "2021");
}

#[tokio::test]
async fn foreign_id_echoes_the_token() {
    let (_h, addr) = TestHarness::with_server(StaticFetcher::new()).await;

    let (status, json) = get_json(addr, "/meta/movie/tt0111161.json").await;
    assert_eq!(status, 200);
    assert_eq!(json["meta"]["id"], "tt0111161");
    assert_eq!(json["meta"]["name"], "tt0111161");
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[tokio::test]
async fn series_meta_lists_sorted_dated_episodes() {
    let url = "https://ak.sv/series/5/show";
    let page = series_page(
        "Show",
        "2020",
        &[
            ("حلقة 2", "https://ak.sv/episode/902/show", "السبت 01 فبراير 2020"),
            ("حلقة 10", "https://ak.sv/episode/910/show", ""),
            ("حلقة 1", "https://ak.sv/episode/901/show", "موعد غير معروف"),
        ],
    );
    let fetcher = StaticFetcher::new().page(url, &page);
    let (_h, addr) = TestHarness::with_server(fetcher).await;

    let token = encode("Show", Some(url));
    let (status, json) = get_json(addr, &format!("/meta/series/{token}.json")).await;
    assert_eq!(status, 200);

    let meta = &json["meta"];
    assert_eq!(meta["type"], "series");
    assert_eq!(meta["name"], "Show");

    let videos = meta["videos"].as_array().expect("videos");
    let episodes: Vec<_> = videos.iter().map(|v| v["episode"].as_u64().unwrap()).collect();
    assert_eq!(episodes, vec![1, 2, 10]);

    assert_eq!(videos[0]["id"], format!("{token}:1:1"));
    assert_eq!(videos[0]["title"], "Episode 1");
    assert_eq!(videos[0]["season"], 1);
    assert_eq!(videos[0]["released"], "2020-01-01T00:00:00.000Z");
    assert_eq!(videos[1]["released"], "2020-02-01T00:00:00.000Z");
    assert_eq!(videos[2]["released"], "2020-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn series_without_year_uses_epoch_year() {
    let url = "https://ak.sv/series/6/other";
    let page = series_page("Other", "", &[("حلقة 1", "https://ak.sv/episode/1/other", "")]);
    let fetcher = StaticFetcher::new().page(url, &page);
    let (_h, addr) = TestHarness::with_server(fetcher).await;

    let token = encode("Other", Some(url));
    let (_, json) = get_json(addr, &format!("/meta/series/{token}.json")).await;
    assert_eq!(
        json["meta"]["videos"][0]["released"],
        "1970-01-01T00:00:00.000Z"
    );
}
