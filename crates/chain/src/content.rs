//! # Content & Account Collaborators
//!
//! The worker core never stores posts or accounts itself. It asks two
//! read-only collaborators supplied by the node:
//!
//! | Trait | Question answered |
//! |-------|-------------------|
//! | `PostStore` | does this post exist, and is it a root post or a comment? |
//! | `AccountDirectory` | does this account exist? |
//!
//! `InMemoryContent` implements both over ordered maps. It is used by tests
//! and by embedders without a real comment index.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;

use crate::types::{AccountName, PostRef};

/// What the core needs to know about a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInfo {
    /// `None` for a root post, `Some(parent)` for a comment.
    pub parent: Option<PostRef>,
}

impl PostInfo {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Read access to the comment/post index.
pub trait PostStore: Send + Sync {
    fn find_post(&self, post: &PostRef) -> Option<PostInfo>;
}

/// Read access to the account index.
pub trait AccountDirectory: Send + Sync {
    fn account_exists(&self, account: &AccountName) -> bool;
}

/// In-memory posts and accounts.
///
/// Interior mutability lets tests add content while an engine holds an `Arc` to it.
#[derive(Debug, Default)]
pub struct InMemoryContent {
    posts: RwLock<BTreeMap<PostRef, PostInfo>>,
    accounts: RwLock<BTreeSet<AccountName>>,
}

impl InMemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_account(&self, name: impl Into<String>) {
        self.accounts.write().insert(AccountName::new(name));
    }

    /// Create a root post. The author account is created if absent.
    pub fn create_post(&self, author: &str, permlink: &str) -> PostRef {
        let post = PostRef::new(author, permlink);
        self.accounts.write().insert(post.author.clone());
        self.posts.write().insert(post.clone(), PostInfo { parent: None });
        post
    }

    /// Create a comment under `parent`.
    pub fn create_comment(&self, author: &str, permlink: &str, parent: &PostRef) -> PostRef {
        let post = PostRef::new(author, permlink);
        self.accounts.write().insert(post.author.clone());
        self.posts.write().insert(post.clone(), PostInfo { parent: Some(parent.clone()) });
        post
    }
}

impl PostStore for InMemoryContent {
    fn find_post(&self, post: &PostRef) -> Option<PostInfo> {
        self.posts.read().get(post).cloned()
    }
}

impl AccountDirectory for InMemoryContent {
    fn account_exists(&self, account: &AccountName) -> bool {
        self.accounts.read().contains(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_post_and_comment() {
        let content = InMemoryContent::new();
        let root = content.create_post("alice", "alice-proposal");
        let comment = content.create_comment("carol", "i-am-comment", &root);

        assert!(content.find_post(&root).unwrap().is_root());
        let info = content.find_post(&comment).unwrap();
        assert!(!info.is_root());
        assert_eq!(info.parent, Some(root));
        assert!(content.find_post(&PostRef::new("bob", "nothing")).is_none());
    }

    #[test]
    fn test_accounts() {
        let content = InMemoryContent::new();
        content.create_account("dave");
        content.create_post("erin", "p");
        assert!(content.account_exists(&AccountName::from("dave")));
        assert!(content.account_exists(&AccountName::from("erin")));
        assert!(!content.account_exists(&AccountName::from("zed")));
    }
}
