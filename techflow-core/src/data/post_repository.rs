use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::data::store::{KeyValueStore, StoreError};
use crate::domain::error::DomainError;
use crate::domain::post::{Category, Post, PostDraft, PostStatus};

/// Store key holding the JSON array of all posts.
pub const POSTS_KEY: &str = "techflow_posts";

/// Owns the canonical post collection. Every operation is a synchronous
/// whole-collection read-modify-write under [`POSTS_KEY`]; there is no
/// partial update and no schema versioning.
pub struct PostRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PostRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the full collection, most-recently-created first. The first
    /// access against an empty store materializes the seed posts.
    pub fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        match self.store.get(POSTS_KEY)? {
            Some(raw) => decode_posts(&raw),
            None => {
                let seed = seed_posts(now_ms());
                self.persist(&seed)?;
                debug!(count = seed.len(), "seeded empty post collection");
                Ok(seed)
            }
        }
    }

    /// Linear search; a missing id is `Ok(None)`, not an error.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Post>, DomainError> {
        Ok(self.list_all()?.into_iter().find(|post| post.id == id))
    }

    /// Updates the post matching `id`, or creates a new one when `id` is
    /// absent or unmatched. Updates overlay the caller-settable fields and
    /// refresh `updated_at`; `id`, `created_at` and `views` are preserved.
    /// New posts get a fresh id, `views = 0` and are prepended.
    pub fn save(&self, draft: PostDraft, id: Option<&str>) -> Result<Post, DomainError> {
        let draft = draft.validate()?;
        let mut posts = self.list_all()?;
        let now = now_ms();

        if let Some(id) = id {
            if let Some(existing) = posts.iter_mut().find(|post| post.id == id) {
                existing.apply(draft);
                existing.updated_at = now;
                let updated = existing.clone();
                self.persist(&posts)?;
                debug!(id = %updated.id, "post updated");
                return Ok(updated);
            }
        }

        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            content: draft.content,
            excerpt: draft.excerpt,
            featured_image: draft.featured_image,
            tags: draft.tags,
            category: draft.category,
            status: draft.status,
            created_at: now,
            updated_at: now,
            author: draft.author,
            views: 0,
        };
        posts.insert(0, post.clone());
        self.persist(&posts)?;
        debug!(id = %post.id, "post created");
        Ok(post)
    }

    /// Removes the matching entry; a missing id is a no-op, not an error.
    pub fn delete_by_id(&self, id: &str) -> Result<(), DomainError> {
        let mut posts = self.list_all()?;
        posts.retain(|post| post.id != id);
        self.persist(&posts)?;
        debug!(%id, "post deleted");
        Ok(())
    }

    /// Increments the view counter by exactly one; no-op for a missing id.
    pub fn increment_views(&self, id: &str) -> Result<(), DomainError> {
        let mut posts = self.list_all()?;
        if let Some(post) = posts.iter_mut().find(|post| post.id == id) {
            post.views += 1;
            self.persist(&posts)?;
        }
        Ok(())
    }

    fn persist(&self, posts: &[Post]) -> Result<(), DomainError> {
        let raw = serde_json::to_string(posts).map_err(|err| StoreError::Encode {
            key: POSTS_KEY.to_string(),
            message: err.to_string(),
        })?;
        self.store.set(POSTS_KEY, &raw)?;
        Ok(())
    }
}

fn decode_posts(raw: &str) -> Result<Vec<Post>, DomainError> {
    serde_json::from_str(raw).map_err(|err| {
        StoreError::Corrupt {
            key: POSTS_KEY.to_string(),
            message: err.to_string(),
        }
        .into()
    })
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Fixed example posts written the first time the store is empty.
fn seed_posts(now: i64) -> Vec<Post> {
    vec![
        Post {
            id: "1".to_string(),
            title: "The Rise of Generative AI in Software Development".to_string(),
            excerpt: "How AI tools like Gemini and ChatGPT are reshaping the way we write code."
                .to_string(),
            content: r#"# The Rise of Generative AI

Artificial Intelligence has moved from a buzzword to a daily utility for developers. With the advent of **LLMs (Large Language Models)**, coding has become more accessible and efficient.

## Key Benefits
1. **Speed**: Boilerplate code is generated in seconds.
2. **Debugging**: AI acts as a pair programmer, spotting errors instantly.
3. **Learning**: Complex concepts are explained in simple terms.

Stay tuned for more updates on how this technology evolves!"#
                .to_string(),
            featured_image: "https://picsum.photos/800/400?random=1".to_string(),
            tags: vec!["AI".to_string(), "Development".to_string(), "Future".to_string()],
            category: Category::ArtificialIntelligence,
            status: PostStatus::Published,
            created_at: now - 10_000_000,
            updated_at: now,
            author: "Admin".to_string(),
            views: 120,
        },
        Post {
            id: "2".to_string(),
            title: "Understanding React Server Components".to_string(),
            excerpt: "A deep dive into the new paradigm of React rendering.".to_string(),
            content: r#"# React Server Components (RSC)

React is evolving. Server Components allow developers to keep some components on the server, reducing the bundle size sent to the client.

## Why RSC?
- **Zero Bundle Size**: Server components aren't included in the JS bundle.
- **Direct Backend Access**: Query databases directly from your components.

This is a game changer for performance."#
                .to_string(),
            featured_image: "https://picsum.photos/800/400?random=2".to_string(),
            tags: vec!["React".to_string(), "Frontend".to_string(), "Web".to_string()],
            category: Category::WebDevelopment,
            status: PostStatus::Published,
            created_at: now - 5_000_000,
            updated_at: now,
            author: "Admin".to_string(),
            views: 85,
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::data::stores::memory::MemoryStore;

    fn repo() -> PostRepository<MemoryStore> {
        PostRepository::new(MemoryStore::new())
    }

    fn sample_draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: "c".to_string(),
            excerpt: "e".to_string(),
            featured_image: String::new(),
            tags: vec!["a".to_string(), "b".to_string()],
            category: Category::WebDevelopment,
            status: PostStatus::Draft,
            author: "Admin".to_string(),
        }
    }

    #[test]
    fn empty_store_materializes_seed_posts() {
        let repo = repo();

        let posts = repo.list_all().expect("list_all must succeed");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "1");
        assert_eq!(posts[1].id, "2");
        assert_eq!(posts[0].views, 120);
        assert_eq!(posts[1].views, 85);
    }

    #[test]
    fn seed_is_stable_across_reads() {
        let repo = repo();

        let first = repo.list_all().expect("first read must succeed");
        let second = repo.list_all().expect("second read must succeed");
        assert_eq!(first, second);
    }

    #[test]
    fn save_without_id_creates_and_prepends() {
        let repo = repo();

        let created = repo
            .save(sample_draft("X"), None)
            .expect("create must succeed");
        assert_eq!(created.views, 0);
        assert_eq!(created.created_at, created.updated_at);
        assert_ne!(created.id, "1");
        assert_ne!(created.id, "2");

        let posts = repo.list_all().expect("list_all must succeed");
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].id, created.id);
    }

    #[test]
    fn created_ids_are_unique() {
        let repo = repo();

        let mut ids = HashSet::new();
        for i in 0..5 {
            let created = repo
                .save(sample_draft(&format!("post {i}")), None)
                .expect("create must succeed");
            assert!(ids.insert(created.id), "id must be fresh");
        }

        let posts = repo.list_all().expect("list_all must succeed");
        let all: HashSet<_> = posts.iter().map(|post| post.id.clone()).collect();
        assert_eq!(all.len(), posts.len());
    }

    #[test]
    fn save_with_matching_id_overlays_and_preserves_identity() {
        let repo = repo();
        let created = repo
            .save(sample_draft("first title"), None)
            .expect("create must succeed");
        repo.increment_views(&created.id)
            .expect("increment must succeed");
        repo.increment_views(&created.id)
            .expect("increment must succeed");

        let len_before = repo.list_all().expect("list must succeed").len();
        let updated = repo
            .save(sample_draft("renamed"), Some(&created.id))
            .expect("update must succeed");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.views, 2);
        assert_eq!(updated.title, "renamed");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.list_all().expect("list must succeed").len(), len_before);
    }

    #[test]
    fn save_with_unknown_id_creates_new_post() {
        let repo = repo();
        let len_before = repo.list_all().expect("list must succeed").len();

        let created = repo
            .save(sample_draft("X"), Some("no-such-id"))
            .expect("save must succeed");
        assert_ne!(created.id, "no-such-id");
        assert_eq!(created.views, 0);
        assert_eq!(
            repo.list_all().expect("list must succeed").len(),
            len_before + 1
        );
    }

    #[test]
    fn increment_views_adds_exactly_one() {
        let repo = repo();
        let before = repo
            .get_by_id("1")
            .expect("get must succeed")
            .expect("seed post 1 must exist")
            .views;

        repo.increment_views("1").expect("increment must succeed");
        repo.increment_views("1").expect("increment must succeed");

        let after = repo
            .get_by_id("1")
            .expect("get must succeed")
            .expect("seed post 1 must exist")
            .views;
        assert_eq!(after, before + 2);
    }

    #[test]
    fn increment_views_is_noop_for_missing_id() {
        let repo = repo();
        let before = repo.list_all().expect("list must succeed");

        repo.increment_views("no-such-id")
            .expect("increment must succeed");
        assert_eq!(repo.list_all().expect("list must succeed"), before);
    }

    #[test]
    fn delete_removes_only_the_matching_entry() {
        let repo = repo();
        let untouched = repo
            .get_by_id("1")
            .expect("get must succeed")
            .expect("seed post 1 must exist");

        repo.delete_by_id("2").expect("delete must succeed");

        assert!(repo.get_by_id("2").expect("get must succeed").is_none());
        let posts = repo.list_all().expect("list must succeed");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0], untouched);
    }

    #[test]
    fn delete_is_idempotent() {
        let repo = repo();
        repo.delete_by_id("2").expect("delete must succeed");
        repo.delete_by_id("2").expect("second delete must succeed");
        assert_eq!(repo.list_all().expect("list must succeed").len(), 1);
    }

    #[test]
    fn get_by_id_returns_none_for_missing_id() {
        let repo = repo();
        assert!(
            repo.get_by_id("no-such-id")
                .expect("get must succeed")
                .is_none()
        );
    }

    #[test]
    fn corrupt_payload_surfaces_store_error() {
        let store = MemoryStore::new();
        store
            .set(POSTS_KEY, "{not-json")
            .expect("set must succeed");
        let repo = PostRepository::new(store);

        let err = repo.list_all().expect_err("corrupt payload must fail");
        assert!(matches!(
            err,
            DomainError::Store(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn save_rejects_invalid_draft_without_persisting() {
        let repo = repo();
        let draft = PostDraft {
            title: "  ".to_string(),
            ..sample_draft("ignored")
        };

        let err = repo.save(draft, None).expect_err("draft must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "title", .. }));
        assert_eq!(repo.list_all().expect("list must succeed").len(), 2);
    }
}
