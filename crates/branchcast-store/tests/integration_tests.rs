//! Integration tests for branchcast-store
//!
//! These tests drive the archive through the `ArchiveStore` trait the way the
//! server does: append batches, read feeds, log views.

use branchcast_domain::traits::ArchiveStore;
use branchcast_domain::{
    BranchId, BranchRegistry, BranchVariant, GenerationDraft, GenerationId, Stance, ViewEvent,
};
use branchcast_store::SqliteArchive;

fn registry() -> BranchRegistry {
    BranchRegistry::default_branches()
}

fn draft(url: &str, stance: Stance, created_at: u64) -> GenerationDraft {
    let variants = registry()
        .iter()
        .enumerate()
        .map(|(i, branch)| {
            BranchVariant::new(
                branch.clone(),
                format!("#{} {} says hi", i, branch),
                format!("Paragraph for {}.\n\nSecond paragraph, with \"quotes\".", branch),
                280,
            )
            .unwrap()
        })
        .collect();
    GenerationDraft::new(url, stance, created_at, variants, &registry()).unwrap()
}

#[test]
fn test_store_initialization() {
    let store = SqliteArchive::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert_eq!(store.unwrap().generation_count().unwrap(), 0);
}

#[test]
fn test_record_holds_every_branch_in_order() {
    let mut store = SqliteArchive::new(":memory:").unwrap();
    let id = store
        .append_generation(draft("https://news.example/1", Stance::Support, 1_000))
        .unwrap();

    let record = store.get_generation(id).unwrap().unwrap();
    assert_eq!(record.variants.len(), registry().len());
    for (variant, branch) in record.variants.iter().zip(registry().iter()) {
        assert_eq!(variant.branch_id().as_str(), branch.as_str());
    }
}

#[test]
fn test_text_survives_unchanged() {
    let mut store = SqliteArchive::new(":memory:").unwrap();
    let submitted = draft("https://news.example/quoted", Stance::Oppose, 1_000);
    let id = store.append_generation(submitted.clone()).unwrap();

    let record = store.get_generation(id).unwrap().unwrap();
    assert_eq!(record.variants, submitted.variants());
    assert_eq!(record.stance, Stance::Oppose);
    assert!(record.variants[0].long_form().contains("\"quotes\""));
}

#[test]
fn test_every_branch_has_a_feed() {
    let mut store = SqliteArchive::new(":memory:").unwrap();
    store
        .append_generation(draft("https://news.example/1", Stance::Support, 1_000))
        .unwrap();
    store
        .append_generation(draft("https://news.example/2", Stance::Oppose, 2_000))
        .unwrap();

    for branch in registry().iter() {
        let feed = store.list_for_branch(branch).unwrap();
        assert_eq!(feed.len(), 2, "feed for {}", branch);
        assert_eq!(feed[0].source_url, "https://news.example/2");
        assert_eq!(feed[0].stance, Stance::Oppose);
        assert_eq!(feed[0].variant.branch_id(), branch);
    }
}

#[test]
fn test_hyphen_and_en_dash_names_share_a_feed() {
    let mut store = SqliteArchive::new(":memory:").unwrap();
    store
        .append_generation(draft("https://news.example/1", Stance::Support, 1_000))
        .unwrap();

    // Default list spells the first branch with an en dash
    let first = registry().iter().next().cloned().unwrap();
    let hyphenated = BranchId::new(first.as_str().replace('\u{2013}', "-"));
    assert_ne!(hyphenated.as_str(), first.as_str());
    let feed = store.list_for_branch(&hyphenated).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].variant.branch_id().as_str(), first.as_str());
}

#[test]
fn test_views_accumulate_per_record() {
    let mut store = SqliteArchive::new(":memory:").unwrap();
    let first = store
        .append_generation(draft("https://news.example/1", Stance::Support, 1_000))
        .unwrap();
    let second = store
        .append_generation(draft("https://news.example/2", Stance::Support, 2_000))
        .unwrap();

    let branch = registry().iter().next().cloned().unwrap();
    for at in [10, 20, 30] {
        assert!(store
            .record_view(
                first,
                ViewEvent {
                    branch_id: branch.clone(),
                    viewed_at: at,
                },
            )
            .unwrap());
    }

    let first = store.get_generation(first).unwrap().unwrap();
    let second = store.get_generation(second).unwrap().unwrap();
    assert_eq!(
        first.views.iter().map(|v| v.viewed_at).collect::<Vec<_>>(),
        vec![10, 20, 30]
    );
    assert!(second.views.is_empty());
}

#[test]
fn test_view_for_missing_generation() {
    let mut store = SqliteArchive::new(":memory:").unwrap();
    let appended = store
        .record_view(
            GenerationId::new(),
            ViewEvent {
                branch_id: BranchId::new("CABANG-X"),
                viewed_at: 1,
            },
        )
        .unwrap();
    assert!(!appended);
    assert_eq!(store.generation_count().unwrap(), 0);
}
