//! Post operations

use super::errors::{RepositoryError, RepositoryResult};
use super::filter::{clean_body, validate_body};
use super::sort::SortOrder;
use super::Repository;
use crate::observability::Logger;
use crate::store::Post;

impl Repository {
    /// Validate, filter and persist a new post
    pub fn create_post(&self, body: &str, author_id: u64) -> RepositoryResult<Post> {
        validate_body(body)?;
        let body = clean_body(body);

        let post = self.store.update(|doc| -> RepositoryResult<Post> {
            let post = Post {
                id: doc.allocate_post_id(),
                body,
                author_id,
            };
            doc.posts.insert(post.id, post.clone());
            Ok(post)
        })?;

        let (post_id, author) = (post.id.to_string(), author_id.to_string());
        Logger::info(
            "POST_CREATED",
            &[("author_id", author.as_str()), ("post_id", post_id.as_str())],
        );
        Ok(post)
    }

    /// All posts, or only those by `author_id` when it is given and non-zero
    pub fn get_posts(&self, author_id: Option<u64>, order: SortOrder) -> RepositoryResult<Vec<Post>> {
        let doc = self.store.load()?;
        let author_id = author_id.filter(|&id| id != 0);

        let mut posts: Vec<Post> = doc
            .posts
            .into_values()
            .filter(|p| author_id.map_or(true, |id| p.author_id == id))
            .collect();
        order.apply(&mut posts);
        Ok(posts)
    }

    pub fn get_post_by_id(&self, id: u64) -> RepositoryResult<Post> {
        self.store
            .load()?
            .posts
            .remove(&id)
            .ok_or(RepositoryError::NotFound("chirp"))
    }

    /// Delete a post; only its author may do so
    pub fn delete_post_by_id(&self, id: u64, requester_id: u64) -> RepositoryResult<()> {
        self.store.update(|doc| -> RepositoryResult<()> {
            let post = doc.posts.get(&id).ok_or(RepositoryError::NotFound("chirp"))?;
            if post.author_id != requester_id {
                return Err(RepositoryError::Forbidden(
                    "Only the author may delete this chirp".to_string(),
                ));
            }
            doc.posts.remove(&id);
            Ok(())
        })?;

        let post_id = id.to_string();
        Logger::info("POST_DELETED", &[("post_id", post_id.as_str())]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo() -> (TempDir, Repository) {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::open(tmp.path().join("db.json")).unwrap();
        (tmp, repo)
    }

    #[test]
    fn test_create_post_assigns_sequential_ids() {
        let (_tmp, repo) = repo();
        let a = repo.create_post("first", 1).unwrap();
        let b = repo.create_post("second", 1).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(repo.get_post_by_id(2).unwrap(), b);
    }

    #[test]
    fn test_create_post_filters_body() {
        let (_tmp, repo) = repo();
        let post = repo.create_post("what a Kerfuffle today", 1).unwrap();
        assert_eq!(post.body, "what a **** today");
    }

    #[test]
    fn test_oversized_body_not_persisted() {
        let (_tmp, repo) = repo();
        let result = repo.create_post(&"x".repeat(141), 1);
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert!(repo.get_posts(None, SortOrder::Asc).unwrap().is_empty());
    }

    #[test]
    fn test_get_posts_filters_by_author() {
        let (_tmp, repo) = repo();
        repo.create_post("a", 1).unwrap();
        repo.create_post("b", 2).unwrap();
        repo.create_post("c", 1).unwrap();

        let mine = repo.get_posts(Some(1), SortOrder::Asc).unwrap();
        assert_eq!(mine.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);

        // Zero means "everyone"
        assert_eq!(repo.get_posts(Some(0), SortOrder::Asc).unwrap().len(), 3);
        assert!(repo.get_posts(Some(9), SortOrder::Asc).unwrap().is_empty());
    }

    #[test]
    fn test_delete_post_ownership() {
        let (_tmp, repo) = repo();
        let post = repo.create_post("mine", 1).unwrap();

        assert!(matches!(
            repo.delete_post_by_id(post.id, 2),
            Err(RepositoryError::Forbidden(_))
        ));
        assert!(repo.get_post_by_id(post.id).is_ok());

        repo.delete_post_by_id(post.id, 1).unwrap();
        assert!(matches!(
            repo.get_post_by_id(post.id),
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete_post_by_id(post.id, 1),
            Err(RepositoryError::NotFound(_))
        ));
    }
}
