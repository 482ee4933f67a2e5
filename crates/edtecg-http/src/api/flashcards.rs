//! Flashcard collections and cards.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use edtecg_core::{ApiRequest, Result};

use crate::client::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: u64,
    pub word: String,
    pub meaning: String,
    pub collection_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardCollection {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub number_of_flashcards: u64,
    pub user_id: u64,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

/// Flashcard endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Flashcards<'a> {
    api: &'a ApiClient,
}

impl<'a> Flashcards<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// List every collection visible to the current user.
    #[instrument(skip(self))]
    pub async fn collections(&self) -> Result<Vec<FlashcardCollection>> {
        self.api.get("flashcard/collections").await
    }

    #[instrument(skip(self))]
    pub async fn collection(&self, id: u64) -> Result<FlashcardCollection> {
        self.api
            .get(&format!("flashcard/getflashcardcollection/{}", id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str, user_id: u64) -> Result<FlashcardCollection> {
        let request = ApiRequest::post("flashcard/createflashcardcollection")
            .query("name", name)
            .query("userId", user_id);
        self.api.json(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_collection(&self, id: u64) -> Result<()> {
        self.api
            .delete(&format!("flashcard/deletecollection/{}", id))
            .await
    }

    /// Add a card to a collection.
    #[instrument(skip(self, meaning))]
    pub async fn add(&self, collection_id: u64, word: &str, meaning: &str) -> Result<Flashcard> {
        let request = ApiRequest::post("flashcard/createflashcard")
            .query("word", word)
            .query("meaning", meaning)
            .query("collectionId", collection_id);
        self.api.json(request).await
    }

    #[instrument(skip(self, meaning))]
    pub async fn update(&self, id: u64, word: &str, meaning: &str) -> Result<Flashcard> {
        let request = ApiRequest::patch(format!("flashcard/updateflashcard/{}", id))
            .query("word", word)
            .query("meaning", meaning);
        self.api.json(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.api
            .delete(&format!("flashcard/deleteflashcard/{}", id))
            .await
    }
}
