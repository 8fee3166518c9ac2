use super::ArtworkStore;
use crate::config::SupabaseCredentials;
use crate::error::{Result, SketchCritiqueError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use sketch_critique_common::{Artwork, NewArtwork, Row};
use std::time::Duration;
use tracing::{debug, warn};

/// Supabase (PostgREST) の artworks テーブル
pub struct SupabaseStore {
    client: Client,
    credentials: SupabaseCredentials,
}

/// PostgREST のフィルタ構文で意味を持つ文字を取り除く
pub fn sanitize_search_term(query: &str) -> String {
    query
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn search_filter(query: &str) -> String {
    let term = sanitize_search_term(query);
    format!("(title.ilike.*{term}*,description.ilike.*{term}*)")
}

fn rows_to_artworks(rows: Vec<Value>) -> Vec<Artwork> {
    rows.into_iter()
        .filter_map(|value| match value {
            Value::Object(row) => match Artwork::from_row(&row) {
                Ok(artwork) => Some(artwork),
                Err(e) => {
                    warn!("読み込めない行をスキップ: {}", e);
                    None
                }
            },
            _ => None,
        })
        .collect()
}

impl SupabaseStore {
    pub fn new(credentials: SupabaseCredentials, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client, credentials })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.credentials.url.trim_end_matches('/'),
            self.credentials.table
        )
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.credentials.key)
            .header("Authorization", format!("Bearer {}", self.credentials.key))
    }

    async fn fetch(&self, query: Vec<(&str, String)>) -> Result<Vec<Artwork>> {
        debug!(?query, "artworks 取得");
        let response = self
            .authorize(self.client.get(self.table_url()))
            .query(&query)
            .send()
            .await
            .map_err(|e| SketchCritiqueError::Datastore(e.to_string()))?;

        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        Ok(rows_to_artworks(rows))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(SketchCritiqueError::Datastore(format!("HTTP {}: {}", status, detail.trim())))
    }
}

fn base_query(limit: Option<usize>) -> Vec<(&'static str, String)> {
    let mut query = vec![("select", "*".to_string()), ("order", "created_at.desc".to_string())];
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    query
}

#[async_trait]
impl ArtworkStore for SupabaseStore {
    async fn insert(&self, artwork: &NewArtwork) -> Result<Artwork> {
        let response = self
            .authorize(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&vec![Value::Object(artwork.to_row())])
            .send()
            .await
            .map_err(|e| SketchCritiqueError::Datastore(e.to_string()))?;

        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        rows_to_artworks(rows)
            .into_iter()
            .next()
            .ok_or_else(|| SketchCritiqueError::Datastore("挿入結果が返りませんでした".into()))
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<Artwork>> {
        self.fetch(base_query(limit)).await
    }

    async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Artwork>> {
        if sanitize_search_term(query).is_empty() {
            return self.list(limit).await;
        }
        let mut params = base_query(limit);
        params.push(("or", search_filter(query)));
        self.fetch(params).await
    }

    async fn get(&self, id: &str) -> Result<Artwork> {
        let query = vec![("select", "*".to_string()), ("id", format!("eq.{}", id))];
        self.fetch(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SketchCritiqueError::ArtworkNotFound(id.to_string()))
    }

    async fn update(&self, id: &str, changes: &Row) -> Result<()> {
        let response = self
            .authorize(self.client.patch(self.table_url()))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await
            .map_err(|e| SketchCritiqueError::Datastore(e.to_string()))?;

        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        if rows.is_empty() {
            return Err(SketchCritiqueError::ArtworkNotFound(id.to_string()));
        }
        Ok(())
    }
}
