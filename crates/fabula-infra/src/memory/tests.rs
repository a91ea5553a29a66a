use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use fabula_core::domain::{Account, Category, Comment, Post, Viewer};
use fabula_core::error::DomainError;
use fabula_core::pagination::PageRequest;
use fabula_core::ports::BaseRepository;
use fabula_core::services::{
    AuthorizationPolicy, CommentThread, DenialMode, FeedScope, OwnershipAuthorizer, PostAuthoring,
    PostDraft, ProfileAggregator, ProfileChanges, VisibilityResolver,
};

use super::MemoryStore;

struct Fixture {
    store: MemoryStore,
    resolver: VisibilityResolver,
    comments: CommentThread,
    profiles: ProfileAggregator,
    authoring: PostAuthoring,
}

fn fixture() -> Fixture {
    fixture_with(AuthorizationPolicy::default())
}

fn fixture_with(policy: AuthorizationPolicy) -> Fixture {
    let store = MemoryStore::new();
    let authorizer = OwnershipAuthorizer::new(policy);
    let resolver = VisibilityResolver::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        policy,
    );
    let comments = CommentThread::new(Arc::new(store.clone()), Arc::new(store.clone()), authorizer);
    let profiles = ProfileAggregator::new(Arc::new(store.clone()), resolver.clone());
    let authoring = PostAuthoring::new(Arc::new(store.clone()), authorizer);

    Fixture {
        store,
        resolver,
        comments,
        profiles,
        authoring,
    }
}

async fn seed_account(store: &MemoryStore, username: &str) -> Account {
    let account = Account::new(
        username.to_string(),
        format!("{username}@example.com"),
        "hash".to_string(),
    );
    store.save(account).await.unwrap()
}

async fn seed_post(store: &MemoryStore, author: &Account, days_ago: i64, published: bool) -> Post {
    let mut post = Post::new(
        author.id,
        "A post".to_string(),
        "Body".to_string(),
        Utc::now() - Duration::days(days_ago),
    );
    post.is_published = published;
    store.save(post).await.unwrap()
}

fn viewer_for(account: &Account) -> Viewer {
    Viewer::Authenticated {
        id: account.id,
        is_staff: account.is_staff,
    }
}

#[tokio::test]
async fn anonymous_feed_holds_only_public_posts() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;

    let public = seed_post(&f.store, &author, 1, true).await;
    // Published but scheduled for tomorrow.
    let mut scheduled = Post::new(
        author.id,
        "Soon".to_string(),
        "Body".to_string(),
        Utc::now() + Duration::days(1),
    );
    scheduled.is_published = true;
    let scheduled = f.store.save(scheduled).await.unwrap();
    // Past date but withdrawn.
    let withdrawn = seed_post(&f.store, &author, 1, false).await;

    let page = f
        .resolver
        .resolve(Viewer::Anonymous, &FeedScope::default(), &PageRequest::default())
        .await
        .unwrap();

    let ids: Vec<Uuid> = page.items.iter().map(|e| e.post.id).collect();
    assert_eq!(ids, vec![public.id]);

    // The author still sees all three.
    let own = f
        .resolver
        .resolve(
            viewer_for(&author),
            &FeedScope::default(),
            &PageRequest::default(),
        )
        .await
        .unwrap();
    let own_ids: Vec<Uuid> = own.items.iter().map(|e| e.post.id).collect();
    assert!(own_ids.contains(&scheduled.id));
    assert!(own_ids.contains(&withdrawn.id));
    assert!(own_ids.contains(&public.id));
}

#[tokio::test]
async fn feed_is_newest_first_and_stable() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;

    let older = seed_post(&f.store, &author, 3, true).await;
    let newest = seed_post(&f.store, &author, 1, true).await;
    let middle = seed_post(&f.store, &author, 2, true).await;

    let first = f
        .resolver
        .resolve(Viewer::Anonymous, &FeedScope::default(), &PageRequest::default())
        .await
        .unwrap();
    let order: Vec<Uuid> = first.items.iter().map(|e| e.post.id).collect();
    assert_eq!(order, vec![newest.id, middle.id, older.id]);

    let second = f
        .resolver
        .resolve(Viewer::Anonymous, &FeedScope::default(), &PageRequest::default())
        .await
        .unwrap();
    let again: Vec<Uuid> = second.items.iter().map(|e| e.post.id).collect();
    assert_eq!(order, again);
}

#[tokio::test]
async fn equal_pub_dates_order_by_id_ascending() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let shared_date = Utc::now() - Duration::days(1);

    for _ in 0..4 {
        let mut post = Post::new(author.id, "Tied".into(), "Body".into(), shared_date);
        post.is_published = true;
        f.store.save(post).await.unwrap();
    }

    let page = f
        .resolver
        .resolve(Viewer::Anonymous, &FeedScope::default(), &PageRequest::default())
        .await
        .unwrap();

    let ids: Vec<Uuid> = page.items.iter().map(|e| e.post.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn unpublished_category_is_not_found_even_with_public_posts() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;

    let mut category = Category::new("travel".into(), "Travel".into(), "".into());
    category.is_published = false;
    let category = f.store.save(category).await.unwrap();

    let mut post = Post::new(
        author.id,
        "Trip".into(),
        "Body".into(),
        Utc::now() - Duration::days(1),
    );
    post.is_published = true;
    post.category_id = Some(category.id);
    f.store.save(post).await.unwrap();

    let scope = FeedScope {
        category_slug: Some("travel".into()),
        author_id: None,
    };
    let result = f
        .resolver
        .resolve(Viewer::Anonymous, &scope, &PageRequest::default())
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    // And the unscoped feed hides the post too.
    let feed = f
        .resolver
        .resolve(Viewer::Anonymous, &FeedScope::default(), &PageRequest::default())
        .await
        .unwrap();
    assert!(feed.items.is_empty());
}

#[tokio::test]
async fn missing_category_slug_is_not_found() {
    let f = fixture();
    let scope = FeedScope {
        category_slug: Some("nope".into()),
        author_id: None,
    };

    let result = f
        .resolver
        .resolve(Viewer::Anonymous, &scope, &PageRequest::default())
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn detail_view_hides_and_reveals_by_the_same_rules() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let reader = seed_account(&f.store, "reader").await;

    let mut scheduled = Post::new(
        author.id,
        "Soon".into(),
        "Body".into(),
        Utc::now() + Duration::days(1),
    );
    scheduled.is_published = true;
    let scheduled = f.store.save(scheduled).await.unwrap();

    let hidden = f
        .resolver
        .resolve_post(viewer_for(&reader), scheduled.id)
        .await;
    assert!(matches!(hidden, Err(DomainError::NotFound { .. })));

    let shown = f
        .resolver
        .resolve_post(viewer_for(&author), scheduled.id)
        .await
        .unwrap();
    assert_eq!(shown.post.id, scheduled.id);
}

#[tokio::test]
async fn comment_counts_are_recomputed_per_call() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let reader = seed_account(&f.store, "reader").await;
    let post = seed_post(&f.store, &author, 1, true).await;

    let before = f
        .resolver
        .resolve_post(Viewer::Anonymous, post.id)
        .await
        .unwrap();
    assert_eq!(before.comment_count, 0);

    f.comments
        .add(viewer_for(&reader), post.id, "nice one")
        .await
        .unwrap();

    let after = f
        .resolver
        .resolve_post(Viewer::Anonymous, post.id)
        .await
        .unwrap();
    assert_eq!(after.comment_count, 1);
}

#[tokio::test]
async fn comment_add_is_gated_on_identity_post_and_text() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let reader = seed_account(&f.store, "reader").await;
    let post = seed_post(&f.store, &author, 1, true).await;

    let anonymous = f.comments.add(Viewer::Anonymous, post.id, "hello").await;
    assert!(matches!(anonymous, Err(DomainError::DeniedUnauthenticated)));

    let missing = f
        .comments
        .add(viewer_for(&reader), Uuid::new_v4(), "hello")
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));

    let blank = f.comments.add(viewer_for(&reader), post.id, "   ").await;
    assert!(matches!(blank, Err(DomainError::Validation(_))));
    assert!(f.comments.list(post.id).await.unwrap().is_empty());

    let ok = f
        .comments
        .add(viewer_for(&reader), post.id, "hello")
        .await
        .unwrap();
    assert_eq!(ok.author_id, reader.id);
}

#[tokio::test]
async fn comments_allowed_on_hidden_posts() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let reader = seed_account(&f.store, "reader").await;

    // Unpublished draft; existence is all that matters for commenting.
    let draft = seed_post(&f.store, &author, 1, false).await;

    let comment = f
        .comments
        .add(viewer_for(&reader), draft.id, "sneak peek")
        .await
        .unwrap();
    assert_eq!(comment.post_id, draft.id);
}

#[tokio::test]
async fn comment_thread_is_oldest_first_with_id_tiebreak() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let post = seed_post(&f.store, &author, 1, true).await;
    let stamp = Utc::now();

    for offset in [2i64, 0, 1] {
        let mut comment = Comment::new(author.id, post.id, format!("minute {offset}"));
        comment.created_at = stamp + Duration::minutes(offset);
        f.store.save(comment).await.unwrap();
    }

    let listed = f.comments.list(post.id).await.unwrap();
    let stamps: Vec<_> = listed.iter().map(|c| c.created_at).collect();
    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted);
}

#[tokio::test]
async fn comment_edit_and_delete_are_author_only() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let reader = seed_account(&f.store, "reader").await;
    let stranger = seed_account(&f.store, "stranger").await;
    let post = seed_post(&f.store, &author, 1, true).await;

    let comment = f
        .comments
        .add(viewer_for(&reader), post.id, "first take")
        .await
        .unwrap();

    let denied = f
        .comments
        .edit(viewer_for(&stranger), comment.id, "hijacked")
        .await;
    assert!(matches!(denied, Err(DomainError::DeniedNotOwner)));

    let edited = f
        .comments
        .edit(viewer_for(&reader), comment.id, "second take")
        .await
        .unwrap();
    assert_eq!(edited.text, "second take");

    let blank = f.comments.edit(viewer_for(&reader), comment.id, " ").await;
    assert!(matches!(blank, Err(DomainError::Validation(_))));

    f.comments
        .delete(viewer_for(&reader), comment.id)
        .await
        .unwrap();

    let twice = f.comments.delete(viewer_for(&reader), comment.id).await;
    assert!(matches!(twice, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn deleting_a_post_takes_its_comments_along() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let reader = seed_account(&f.store, "reader").await;
    let post = seed_post(&f.store, &author, 1, true).await;

    let comment = f
        .comments
        .add(viewer_for(&reader), post.id, "so long")
        .await
        .unwrap();

    f.authoring.delete(viewer_for(&author), post.id).await.unwrap();

    let orphan: Option<Comment> = f.store.find_by_id(comment.id).await.unwrap();
    assert!(orphan.is_none());

    let twice = f.authoring.delete(viewer_for(&author), post.id).await;
    assert!(matches!(twice, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn anonymous_post_create_persists_nothing() {
    let f = fixture();

    let result = f
        .authoring
        .create(
            Viewer::Anonymous,
            PostDraft {
                title: "Ghost".into(),
                text: "Body".into(),
                image_ref: None,
                pub_date: Utc::now(),
                is_published: true,
                category_id: None,
                location_id: None,
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::DeniedUnauthenticated)));

    let feed = f
        .resolver
        .resolve(Viewer::Anonymous, &FeedScope::default(), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(feed.total, 0);
}

#[tokio::test]
async fn post_update_keeps_the_original_author() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let post = seed_post(&f.store, &author, 1, true).await;

    let updated = f
        .authoring
        .update(
            viewer_for(&author),
            post.id,
            PostDraft {
                title: "Retitled".into(),
                text: "New body".into(),
                image_ref: Some("cover.webp".into()),
                pub_date: post.pub_date,
                is_published: true,
                category_id: None,
                location_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.author_id, author.id);
    assert_eq!(updated.title, "Retitled");
}

#[tokio::test]
async fn stranger_edits_are_denied_before_any_write() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;
    let stranger = seed_account(&f.store, "stranger").await;
    let post = seed_post(&f.store, &author, 1, true).await;

    let denied = f
        .authoring
        .update(
            viewer_for(&stranger),
            post.id,
            PostDraft {
                title: "Mine now".into(),
                text: "Body".into(),
                image_ref: None,
                pub_date: post.pub_date,
                is_published: true,
                category_id: None,
                location_id: None,
            },
        )
        .await;
    assert!(matches!(denied, Err(DomainError::DeniedNotOwner)));

    let unchanged: Option<Post> = f.store.find_by_id(post.id).await.unwrap();
    assert_eq!(unchanged.unwrap().title, "A post");
}

#[tokio::test]
async fn staff_override_opens_both_writes_and_reads() {
    let policy = AuthorizationPolicy {
        staff_override: true,
        denial_mode: DenialMode::Forbidden,
    };
    let f = fixture_with(policy);

    let author = seed_account(&f.store, "writer").await;
    let mut moderator = Account::new(
        "moderator".into(),
        "moderator@example.com".into(),
        "hash".into(),
    );
    moderator.is_staff = true;
    let moderator = f.store.save(moderator).await.unwrap();

    let hidden = seed_post(&f.store, &author, 1, false).await;

    // Staff see the withdrawn post...
    let seen = f
        .resolver
        .resolve_post(viewer_for(&moderator), hidden.id)
        .await;
    assert!(seen.is_ok());

    // ...and may delete it.
    f.authoring
        .delete(viewer_for(&moderator), hidden.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn profile_paginates_after_filtering() {
    let f = fixture();
    let author = seed_account(&f.store, "writer").await;

    // 15 public posts and 5 drafts; a stranger's page must never count
    // the drafts.
    for day in 1..=15 {
        seed_post(&f.store, &author, day, true).await;
    }
    for day in 1..=5 {
        seed_post(&f.store, &author, day, false).await;
    }

    let stranger = seed_account(&f.store, "stranger").await;

    let first = f
        .profiles
        .profile(viewer_for(&stranger), "writer", &PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(first.posts.items.len(), 10);
    assert_eq!(first.posts.total, 15);
    assert!(first.posts.has_more());
    assert!(!first.is_owner);

    let second = f
        .profiles
        .profile(viewer_for(&stranger), "writer", &PageRequest::new(2, 10))
        .await
        .unwrap();
    assert_eq!(second.posts.items.len(), 5);
    assert!(!second.posts.has_more());

    // The owner's own page counts every draft as well.
    let own = f
        .profiles
        .profile(viewer_for(&author), "writer", &PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(own.posts.total, 20);
    assert!(own.is_owner);
}

#[tokio::test]
async fn profile_rejects_zero_pages_and_unknown_accounts() {
    let f = fixture();
    seed_account(&f.store, "writer").await;

    let missing = f
        .profiles
        .profile(Viewer::Anonymous, "nobody", &PageRequest::default())
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));

    let zero = f
        .profiles
        .profile(Viewer::Anonymous, "writer", &PageRequest::new(0, 10))
        .await;
    assert!(matches!(zero, Err(DomainError::Validation(_))));

    let past_the_end = f
        .profiles
        .profile(Viewer::Anonymous, "writer", &PageRequest::new(9, 10))
        .await
        .unwrap();
    assert!(past_the_end.posts.items.is_empty());
}

#[tokio::test]
async fn profile_edit_touches_only_the_three_fields() {
    let f = fixture();
    let account = seed_account(&f.store, "writer").await;

    let updated = f
        .profiles
        .update_profile(
            viewer_for(&account),
            ProfileChanges {
                first_name: "Ada".into(),
                last_name: "L.".into(),
                email: "ada@example.com".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.username, "writer");
    assert_eq!(updated.password_hash, "hash");
    assert!(!updated.is_staff);

    let bad_email = f
        .profiles
        .update_profile(
            viewer_for(&account),
            ProfileChanges {
                first_name: "Ada".into(),
                last_name: "L.".into(),
                email: "not-an-email".into(),
            },
        )
        .await;
    assert!(matches!(bad_email, Err(DomainError::Validation(_))));

    let anonymous = f
        .profiles
        .update_profile(
            Viewer::Anonymous,
            ProfileChanges {
                first_name: "X".into(),
                last_name: "Y".into(),
                email: "x@example.com".into(),
            },
        )
        .await;
    assert!(matches!(anonymous, Err(DomainError::DeniedUnauthenticated)));
}
