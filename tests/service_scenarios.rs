mod common;

use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;

use shorten_uri::application::services::{LinkService, RedirectService};
use shorten_uri::domain::click_event::ClickEvent;
use shorten_uri::domain::click_worker::run_click_worker;
use shorten_uri::domain::repositories::LinkRepository;
use shorten_uri::error::AppError;
use shorten_uri::infrastructure::persistence::InMemoryLinkRepository;
use shorten_uri::utils::code_generator::{
    RandomCodeGenerator, SequenceCodeGenerator, is_generated_format,
};

fn services(
    codes: &[&str],
) -> (
    LinkService<InMemoryLinkRepository, SequenceCodeGenerator>,
    RedirectService<InMemoryLinkRepository>,
) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let generator = Arc::new(SequenceCodeGenerator::new(codes.iter().copied()));

    (
        LinkService::new(repo.clone(), generator, common::BASE_URL),
        RedirectService::new(repo, common::BASE_URL),
    )
}

#[tokio::test]
async fn test_assign_then_resolve() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let links = LinkService::new(
        repo.clone(),
        Arc::new(RandomCodeGenerator::new()),
        common::BASE_URL,
    );
    let redirects = RedirectService::new(repo, common::BASE_URL);

    let link = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();

    assert!(is_generated_format(&link.code));
    assert_eq!(link.click_count, 0);
    assert_eq!(redirects.resolve(&link.code).await.unwrap(), "https://x.io/a");
}

#[tokio::test]
async fn test_shorten_follow_and_count() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let links = LinkService::new(
        repo.clone(),
        Arc::new(RandomCodeGenerator::new()),
        common::BASE_URL,
    );
    let redirects = RedirectService::new(repo, common::BASE_URL);

    let link = links
        .create_short_link("https://example.com".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(link.code.len(), 8);

    for _ in 0..3 {
        assert_eq!(
            redirects.resolve(&link.code).await.unwrap(),
            "https://example.com"
        );
        redirects.record_click(&link.code).await.unwrap();
    }

    assert_eq!(redirects.stats(&link.code).await.unwrap().click_count, 3);
}

#[tokio::test]
async fn test_resubmission_with_other_custom_code_keeps_original() {
    let (links, redirects) = services(&["gen00001"]);

    links
        .create_short_link("https://a.com".to_string(), Some("mycode".to_string()), None)
        .await
        .unwrap();
    let again = links
        .create_short_link("https://a.com".to_string(), Some("other".to_string()), None)
        .await
        .unwrap();

    assert_eq!(again.code, "mycode");
    assert!(matches!(
        redirects.resolve("other").await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_same_url_gets_same_code() {
    let (links, _) = services(&["first000", "second00"]);

    let first = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();
    let second = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();

    assert_eq!(first.code, "first000");
    assert_eq!(second.code, "first000");
}

#[tokio::test]
async fn test_dedup_ignores_custom_code_and_expiry() {
    let (links, redirects) = services(&["gen00001"]);

    let first = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();
    let second = links
        .create_short_link(
            "https://x.io/a".to_string(),
            Some("mine".to_string()),
            Some(Utc::now() - Duration::seconds(1)),
        )
        .await
        .unwrap();

    assert_eq!(second, first);
    assert!(redirects.stats("mine").await.is_err());
    assert_eq!(redirects.count_links().await.unwrap(), 1);
}

#[tokio::test]
async fn test_custom_code_is_used_verbatim() {
    let (links, redirects) = services(&["gen00001"]);

    let link = links
        .create_short_link("https://x.io/b".to_string(), Some("Promo".to_string()), None)
        .await
        .unwrap();

    assert_eq!(link.code, "Promo");
    assert_eq!(redirects.resolve("Promo").await.unwrap(), "https://x.io/b");
    assert!(matches!(
        redirects.resolve("promo").await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_taken_custom_code_conflicts() {
    let (links, redirects) = services(&["gen00001"]);

    links
        .create_short_link("https://x.io/b".to_string(), Some("promo".to_string()), None)
        .await
        .unwrap();

    let err = links
        .create_short_link("https://x.io/c".to_string(), Some("promo".to_string()), None)
        .await
        .unwrap_err();

    assert_eq!(err.conflicting_code(), Some("promo"));
    assert_eq!(redirects.resolve("promo").await.unwrap(), "https://x.io/b");
}

#[tokio::test]
async fn test_generated_collision_draws_again() {
    let (links, _) = services(&["taken000", "taken000", "free0000"]);

    links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();

    let link = links
        .create_short_link("https://x.io/b".to_string(), None, None)
        .await
        .unwrap();

    assert_eq!(link.code, "free0000");
}

#[tokio::test]
async fn test_generated_collisions_exhaust_attempts() {
    let (links, redirects) = services(&["taken000"]);
    let links = links.with_max_attempts(3);

    links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();

    let err = links
        .create_short_link("https://x.io/b".to_string(), None, None)
        .await
        .unwrap_err();

    assert_eq!(err.conflicting_code(), Some("taken000"));
    assert_eq!(redirects.count_links().await.unwrap(), 1);
}

#[tokio::test]
async fn test_expiry_is_checked_on_every_resolve() {
    let (links, redirects) = services(&["gen00001"]);
    let deadline = Utc::now() + Duration::hours(1);

    let link = links
        .create_short_link("https://x.io/a".to_string(), None, Some(deadline))
        .await
        .unwrap();

    let before = redirects
        .resolve_at(&link.code, deadline - Duration::seconds(1))
        .await;
    assert_eq!(before.unwrap(), "https://x.io/a");

    let at_deadline = redirects.resolve_at(&link.code, deadline).await;
    assert_eq!(at_deadline.unwrap(), "https://x.io/a");

    let after = redirects.resolve_at(&link.code, deadline + Duration::days(1)).await;
    assert!(matches!(after, Err(AppError::Expired { .. })));
}

#[tokio::test]
async fn test_already_expired_link_fails_resolution() {
    let (links, redirects) = services(&["gen00001"]);

    let link = links
        .create_short_link(
            "https://x.io/a".to_string(),
            None,
            Some(Utc::now() - Duration::seconds(1)),
        )
        .await
        .unwrap();

    let err = redirects.resolve(&link.code).await.unwrap_err();
    assert!(matches!(err, AppError::Expired { .. }));

    let stats = redirects.stats(&link.code).await.unwrap();
    assert_eq!(stats.click_count, 0);
}

#[tokio::test]
async fn test_record_click_counts_expired_link() {
    let (links, redirects) = services(&["gen00001"]);

    let link = links
        .create_short_link(
            "https://x.io/old".to_string(),
            None,
            Some(Utc::now() - Duration::seconds(1)),
        )
        .await
        .unwrap();

    redirects.record_click(&link.code).await.unwrap();
    redirects.record_click(&link.code).await.unwrap();

    let stats = redirects.stats(&link.code).await.unwrap();
    assert_eq!(stats.click_count, 2);

    let err = redirects.resolve(&link.code).await.unwrap_err();
    assert!(matches!(err, AppError::Expired { .. }));
}

#[tokio::test]
async fn test_resolve_does_not_count_clicks() {
    let (links, redirects) = services(&["gen00001"]);

    let link = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();

    for _ in 0..3 {
        redirects.resolve(&link.code).await.unwrap();
    }

    assert_eq!(redirects.stats(&link.code).await.unwrap().click_count, 0);
}

#[tokio::test]
async fn test_stats_view() {
    let (links, redirects) = services(&["gen00001"]);

    let link = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();
    redirects.record_click(&link.code).await.unwrap();
    redirects.record_click(&link.code).await.unwrap();

    let stats = redirects.stats(&link.code).await.unwrap();

    assert_eq!(stats.code, "gen00001");
    assert_eq!(stats.long_url, "https://x.io/a");
    assert_eq!(stats.short_url, "http://sho.rt/gen00001");
    assert_eq!(stats.created_at, link.created_at);
    assert_eq!(stats.expires_at, None);
    assert_eq!(stats.click_count, 2);
}

#[tokio::test]
async fn test_record_click_on_unknown_code_is_silent() {
    let (_, redirects) = services(&["gen00001"]);

    assert!(redirects.record_click("nope").await.is_ok());
    assert_eq!(redirects.count_links().await.unwrap(), 0);
}

#[tokio::test]
async fn test_remove_frees_code() {
    let (links, redirects) = services(&["gen00001"]);

    links
        .create_short_link("https://x.io/a".to_string(), Some("promo".to_string()), None)
        .await
        .unwrap();

    redirects.remove("promo").await.unwrap();

    assert!(matches!(
        redirects.resolve("promo").await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        redirects.remove("promo").await,
        Err(AppError::NotFound { .. })
    ));

    let reused = links
        .create_short_link("https://x.io/b".to_string(), Some("promo".to_string()), None)
        .await
        .unwrap();
    assert_eq!(reused.long_url, "https://x.io/b");
}

#[tokio::test]
async fn test_removing_url_mapping_allows_fresh_assignment() {
    let (links, redirects) = services(&["gen00001", "gen00002"]);

    let first = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();
    redirects.remove(&first.code).await.unwrap();

    let second = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();

    assert_eq!(second.code, "gen00002");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clicks_are_all_counted() {
    let (links, redirects) = services(&["hot00000"]);
    let redirects = Arc::new(redirects);

    let link = links
        .create_short_link("https://x.io/hot".to_string(), None, None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let redirects = Arc::clone(&redirects);
        let code = link.code.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..100 {
                redirects.record_click(&code).await.unwrap();
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(redirects.stats(&link.code).await.unwrap().click_count, 1000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_code_claims_admit_one() {
    let (links, _) = services(&["gen00001"]);
    let links = Arc::new(links);

    let mut handles = Vec::new();
    for i in 0..8 {
        let links = Arc::clone(&links);
        handles.push(tokio::spawn(async move {
            links
                .create_short_link(format!("https://x.io/{i}"), Some("same".to_string()), None)
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert_eq!(e.conflicting_code(), Some("same")),
        }
    }

    assert_eq!(winners, 1);
}

// Known race: dedup is check-then-insert, so concurrent first-time creations of one
// URL may both insert. Each still gets a working code; no mapping is lost.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_creations_of_one_url_all_resolve() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let links = Arc::new(LinkService::new(
        repo.clone(),
        Arc::new(RandomCodeGenerator::new()),
        common::BASE_URL,
    ));
    let redirects = RedirectService::new(repo.clone(), common::BASE_URL);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let links = Arc::clone(&links);
        handles.push(tokio::spawn(async move {
            links
                .create_short_link("https://x.io/race".to_string(), None, None)
                .await
                .unwrap()
        }));
    }

    let mut codes = Vec::new();
    for handle in handles {
        codes.push(handle.await.unwrap().code);
    }

    for code in &codes {
        assert_eq!(redirects.resolve(code).await.unwrap(), "https://x.io/race");
    }

    let stored = repo.count().await.unwrap();
    assert!((1..=8).contains(&stored));

    let canonical = repo.find_by_long_url("https://x.io/race").await.unwrap();
    assert!(codes.contains(&canonical.unwrap().code));
}

#[tokio::test]
async fn test_click_worker_drains_queue_on_shutdown() {
    let (links, redirects) = services(&["gen00001"]);
    let redirects = Arc::new(redirects);

    let link = links
        .create_short_link("https://x.io/a".to_string(), None, None)
        .await
        .unwrap();

    let (tx, rx) = mpsc::channel(100);
    let worker = tokio::spawn(run_click_worker(rx, redirects.clone(), 4));

    for _ in 0..25 {
        tx.send(ClickEvent::new(link.code.clone())).await.unwrap();
    }
    tx.send(ClickEvent::new("unknown")).await.unwrap();
    drop(tx);

    worker.await.unwrap();

    assert_eq!(redirects.stats(&link.code).await.unwrap().click_count, 25);
}
