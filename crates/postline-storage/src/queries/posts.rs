// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blog post operations.

use postline_core::types::now_timestamp;
use postline_core::{BlogPost, BlogPostSummary, NewBlogPost, PostQuery, PostStatus, PostlineError};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Outcome of an insert attempt, decided inside the connection thread.
enum InsertOutcome {
    Inserted(BlogPost),
    SlugTaken,
}

/// Returns true if `err` is a UNIQUE violation on `blog_posts.slug`.
fn is_slug_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, msg) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && msg.as_deref().is_some_and(|m| m.contains("blog_posts.slug"))
        }
        _ => false,
    }
}

fn parse_status(raw: &str) -> Result<PostStatus, rusqlite::Error> {
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Check whether a post with the given slug exists.
pub async fn slug_exists(db: &Database, slug: &str) -> Result<bool, PostlineError> {
    let slug = slug.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM blog_posts WHERE slug = ?1)",
                params![slug],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new post, assigning its id and timestamps.
///
/// A collision on the slug index is reported as [`PostlineError::SlugTaken`].
pub async fn insert_post(db: &Database, post: &NewBlogPost) -> Result<BlogPost, PostlineError> {
    let now = now_timestamp();
    let record = BlogPost {
        id: uuid::Uuid::new_v4().to_string(),
        slug: post.slug.clone(),
        title: post.title.clone(),
        content: post.content.clone(),
        excerpt: post.excerpt.clone(),
        featured_image: post.featured_image.clone(),
        meta_description: post.meta_description.clone(),
        meta_keywords: post.meta_keywords.clone(),
        author: post.author.clone(),
        status: post.status,
        published_at: post.published_at.clone(),
        execution_id: post.execution_id.clone(),
        auto_generated: post.auto_generated,
        created_at: now.clone(),
        updated_at: now,
    };
    let keywords = serde_json::to_string(&record.meta_keywords).map_err(|e| {
        PostlineError::Storage {
            source: Box::new(e),
        }
    })?;

    let outcome = db
        .connection()
        .call(move |conn| -> Result<InsertOutcome, rusqlite::Error> {
            let result = conn.execute(
                "INSERT INTO blog_posts (id, slug, title, content, excerpt, featured_image,
                    meta_description, meta_keywords, author, status, published_at,
                    execution_id, auto_generated, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    record.id,
                    record.slug,
                    record.title,
                    record.content,
                    record.excerpt,
                    record.featured_image,
                    record.meta_description,
                    keywords,
                    record.author,
                    record.status.to_string(),
                    record.published_at,
                    record.execution_id,
                    record.auto_generated,
                    record.created_at,
                    record.updated_at,
                ],
            );
            match result {
                Ok(_) => Ok(InsertOutcome::Inserted(record)),
                Err(e) if is_slug_violation(&e) => Ok(InsertOutcome::SlugTaken),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        InsertOutcome::Inserted(stored) => Ok(stored),
        InsertOutcome::SlugTaken => Err(PostlineError::SlugTaken {
            slug: post.slug.clone(),
        }),
    }
}

/// List posts, newest publication first, then newest creation first.
pub async fn list_posts(
    db: &Database,
    query: &PostQuery,
) -> Result<Vec<BlogPostSummary>, PostlineError> {
    let status = query.status.map(|s| s.to_string());
    let limit = i64::from(query.limit);
    let offset = i64::from(query.offset);
    db.connection()
        .call(move |conn| -> Result<Vec<BlogPostSummary>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, slug, title, excerpt, featured_image, author, published_at, status
                 FROM blog_posts
                 WHERE ?1 IS NULL OR status = ?1
                 ORDER BY published_at DESC, created_at DESC
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt.query_map(params![status, limit, offset], |row| {
                let status: String = row.get(7)?;
                Ok(BlogPostSummary {
                    id: row.get(0)?,
                    slug: row.get(1)?,
                    title: row.get(2)?,
                    excerpt: row.get(3)?,
                    featured_image: row.get(4)?,
                    author: row.get(5)?,
                    published_at: row.get(6)?,
                    status: parse_status(&status)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a full post by slug.
pub async fn get_post_by_slug(db: &Database, slug: &str) -> Result<Option<BlogPost>, PostlineError> {
    let slug = slug.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<BlogPost>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, slug, title, content, excerpt, featured_image, meta_description,
                        meta_keywords, author, status, published_at, execution_id,
                        auto_generated, created_at, updated_at
                 FROM blog_posts WHERE slug = ?1",
            )?;
            let result = stmt.query_row(params![slug], |row| {
                let keywords: String = row.get(7)?;
                let status: String = row.get(9)?;
                Ok(BlogPost {
                    id: row.get(0)?,
                    slug: row.get(1)?,
                    title: row.get(2)?,
                    content: row.get(3)?,
                    excerpt: row.get(4)?,
                    featured_image: row.get(5)?,
                    meta_description: row.get(6)?,
                    meta_keywords: serde_json::from_str(&keywords).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            7,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    author: row.get(8)?,
                    status: parse_status(&status)?,
                    published_at: row.get(10)?,
                    execution_id: row.get(11)?,
                    auto_generated: row.get(12)?,
                    created_at: row.get(13)?,
                    updated_at: row.get(14)?,
                })
            });
            match result {
                Ok(post) => Ok(Some(post)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}
