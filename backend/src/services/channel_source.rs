use crate::config::StoreSettings;
use crate::services::channel_service::FetchError;
use bson::{doc, Document};
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::options::ClientOptions;
use mongodb::Client;
use tokio::sync::OnceCell;

/// Read-only access to the raw channel documents.
#[rocket::async_trait]
pub trait ChannelSource: Send + Sync {
    /// Every document of the collection, in the order the store returns them.
    async fn load_documents(&self) -> Result<Vec<Document>, FetchError>;
}

pub struct MongoChannelSource {
    settings: StoreSettings,
    client: OnceCell<Client>,
}

impl MongoChannelSource {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Client, FetchError> {
        self.client
            .get_or_try_init(|| async {
                let uri = self
                    .settings
                    .uri
                    .as_deref()
                    .ok_or(FetchError::MissingConnectionString)?;

                let mut options = ClientOptions::parse(uri)
                    .await
                    .map_err(|e| FetchError::Connection(e.to_string()))?;
                options.connect_timeout = Some(self.settings.timeout);
                options.server_selection_timeout = Some(self.settings.timeout);
                options.app_name = Some("channel-tracker".to_string());

                info!("Creating MongoDB client for database '{}'", self.settings.database);
                Client::with_options(options).map_err(|e| FetchError::Connection(e.to_string()))
            })
            .await
    }
}

#[rocket::async_trait]
impl ChannelSource for MongoChannelSource {
    async fn load_documents(&self) -> Result<Vec<Document>, FetchError> {
        let client = self.client().await?;
        let collection = client
            .database(&self.settings.database)
            .collection::<Document>(&self.settings.collection);

        let cursor = collection
            .find(doc! {}, None)
            .await
            .map_err(|e| FetchError::Query(e.to_string()))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| FetchError::Query(e.to_string()))?;

        debug!(
            "Read {} documents from '{}'",
            documents.len(),
            self.settings.collection
        );
        Ok(documents)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory source that counts how often it was read.
    pub struct StaticChannelSource {
        result: Mutex<Result<Vec<Document>, FetchError>>,
        loads: AtomicUsize,
    }

    impl StaticChannelSource {
        pub fn new(documents: Vec<Document>) -> Self {
            Self {
                result: Mutex::new(Ok(documents)),
                loads: AtomicUsize::new(0),
            }
        }

        pub fn failing(error: FetchError) -> Self {
            Self {
                result: Mutex::new(Err(error)),
                loads: AtomicUsize::new(0),
            }
        }

        pub fn set_documents(&self, documents: Vec<Document>) {
            *self.result.lock().unwrap() = Ok(documents);
        }

        pub fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[rocket::async_trait]
    impl ChannelSource for StaticChannelSource {
        async fn load_documents(&self) -> Result<Vec<Document>, FetchError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.result.lock().unwrap().clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn missing_connection_string_is_a_fetch_error() {
        let source = MongoChannelSource::new(StoreSettings {
            uri: None,
            database: "db".to_string(),
            collection: "channels".to_string(),
            timeout: Duration::from_secs(1),
        });

        let result = source.load_documents().await;
        assert_eq!(result, Err(FetchError::MissingConnectionString));
    }

    #[tokio::test]
    async fn malformed_connection_string_is_a_connection_error() {
        let source = MongoChannelSource::new(StoreSettings {
            uri: Some("not-a-mongodb-uri".to_string()),
            database: "db".to_string(),
            collection: "channels".to_string(),
            timeout: Duration::from_secs(1),
        });

        let result = source.load_documents().await;
        assert!(matches!(result, Err(FetchError::Connection(_))));
    }
}
