use serde::Serialize;

use super::post::{Post, PostStatus};

/// Aggregate numbers shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
    pub total_views: u64,
}

impl DashboardStats {
    pub fn from_posts(posts: &[Post]) -> Self {
        let published_posts = posts
            .iter()
            .filter(|post| post.status == PostStatus::Published)
            .count();

        Self {
            total_posts: posts.len(),
            published_posts,
            draft_posts: posts.len() - published_posts,
            total_views: posts.iter().map(|post| post.views).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::Category;

    fn sample_post(id: &str, status: PostStatus, views: u64) -> Post {
        Post {
            id: id.to_string(),
            title: "T".to_string(),
            content: "C".to_string(),
            excerpt: String::new(),
            featured_image: String::new(),
            tags: vec![],
            category: Category::WebDevelopment,
            status,
            created_at: 0,
            updated_at: 0,
            author: "Admin".to_string(),
            views,
        }
    }

    #[test]
    fn stats_count_statuses_and_sum_views() {
        let posts = vec![
            sample_post("1", PostStatus::Published, 120),
            sample_post("2", PostStatus::Published, 85),
            sample_post("3", PostStatus::Draft, 0),
        ];

        let stats = DashboardStats::from_posts(&posts);
        assert_eq!(stats.total_posts, 3);
        assert_eq!(stats.published_posts, 2);
        assert_eq!(stats.draft_posts, 1);
        assert_eq!(stats.total_views, 205);
    }

    #[test]
    fn stats_for_empty_collection_are_zero() {
        assert_eq!(DashboardStats::from_posts(&[]), DashboardStats::default());
    }
}
