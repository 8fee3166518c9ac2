//! アートワークのデータストア
//!
//! 評価は横持ちの1行として保存される（common::mapping 参照）。

mod supabase;

pub use supabase::{sanitize_search_term, SupabaseStore};

use crate::error::Result;
use async_trait::async_trait;
use sketch_critique_common::{Artwork, NewArtwork, Row};

#[async_trait]
pub trait ArtworkStore: Send + Sync {
    /// 1件追加して保存後の行を返す
    async fn insert(&self, artwork: &NewArtwork) -> Result<Artwork>;

    /// created_at の新しい順。`None` は全件
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Artwork>>;

    /// タイトル・説明の部分一致（大文字小文字を区別しない）
    async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Artwork>>;

    async fn get(&self, id: &str) -> Result<Artwork>;

    /// 指定列だけを更新
    async fn update(&self, id: &str, changes: &Row) -> Result<()>;
}
