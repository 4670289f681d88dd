//! Per-process wiring of the SQLite and filesystem adapters.
//!
//! An [`Engine`] owns the long-lived pieces: the full-text index pool, the
//! verse registry, and the document source. The commentary pool is opened
//! for each request and closed before the request returns, whether it
//! succeeded or not.

use anyhow::Result;

use lectio_core::router::{ContextRequest, ContextResponse, QueryRouter, SearchResponse};
use lectio_core::QueryError;

use crate::config::Config;
use crate::db;
use crate::documents::FsDocumentSource;
use crate::sqlite_store::{
    BibleRegistry, SqliteCommentaryStore, SqliteFullTextIndex, SqliteVerseStore,
};

pub struct Engine {
    config: Config,
    index: SqliteFullTextIndex,
    verses: SqliteVerseStore,
    documents: FsDocumentSource,
}

impl Engine {
    /// Open the full-text index and set up the other adapters.
    pub async fn open(config: &Config) -> Result<Self> {
        let index = SqliteFullTextIndex::new(db::connect(&config.index.path).await?);
        Ok(Self {
            config: config.clone(),
            index,
            verses: SqliteVerseStore::new(BibleRegistry::from_config(&config.bible)),
            documents: FsDocumentSource::new(config.documents.root.clone()),
        })
    }

    async fn open_commentary(&self) -> Result<SqliteCommentaryStore, QueryError> {
        let pool = db::connect(&self.config.commentary.path).await?;
        Ok(SqliteCommentaryStore::new(pool))
    }

    fn router<'a>(&'a self, commentary: &'a SqliteCommentaryStore) -> QueryRouter<'a> {
        QueryRouter::new(
            &self.verses,
            commentary,
            &self.index,
            &self.documents,
            self.config.router_options(),
        )
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, QueryError> {
        let commentary = self.open_commentary().await?;
        let result = self.router(&commentary).search(query).await;
        commentary.close().await;
        result
    }

    pub async fn context(&self, req: &ContextRequest) -> Result<ContextResponse, QueryError> {
        let commentary = self.open_commentary().await?;
        let result = self.router(&commentary).context(req).await;
        commentary.close().await;
        result
    }

    pub async fn close(&self) {
        self.index.close().await;
    }
}
