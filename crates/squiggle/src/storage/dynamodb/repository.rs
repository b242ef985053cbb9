//! DynamoDB repository implementation.
//!
//! Implements `PlayRepository` from `squiggle_core::storage` using DynamoDB.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use squiggle_core::play::Play;
use squiggle_core::storage::{PlayRepository, Result};

use super::conversions::{item_to_play, play_key, play_to_item, ID_ATTRIBUTE};
use super::error::{
    map_delete_item_error, map_describe_table_error, map_get_item_error, map_put_item_error,
    map_scan_error,
};
use crate::config::StoreConfig;

/// DynamoDB-based repository implementation.
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a repository from an explicit store configuration.
    ///
    /// Uses the AWS SDK default credential chain unless the configuration
    /// asks for the static local-development credentials.
    pub async fn connect(store: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(store.region.clone()));

        if let Some(endpoint) = &store.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        if store.static_credentials {
            loader = loader.credentials_provider(Credentials::new(
                "dummy",
                "dummy",
                None,
                None,
                "squiggle-local",
            ));
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), store.table_name.clone())
    }

    /// Checks that the table exists and the endpoint answers.
    pub async fn verify_table(&self) -> Result<()> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, &self.table_name))?;

        Ok(())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl PlayRepository for DynamoDbRepository {
    async fn create_play(&self, play: &Play) -> Result<()> {
        let item = play_to_item(play);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn list_plays(&self) -> Result<Vec<Play>> {
        let plays = collect_scan_pages(move |start_key| async move {
            let mut output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(map_scan_error)?;

            Ok(ScanPage {
                items: output.items.take().unwrap_or_default(),
                last_evaluated_key: output.last_evaluated_key.take(),
            })
        })
        .await?;

        tracing::debug!(count = plays.len(), table = %self.table_name, "Scanned plays");

        Ok(plays)
    }

    async fn get_play(&self, id: &str) -> Result<Option<Play>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, play_key(id))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_play(&item)?)),
            None => Ok(None),
        }
    }

    async fn delete_play(&self, id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, play_key(id))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }
}

type Item = HashMap<String, AttributeValue>;

/// One page of a table scan.
struct ScanPage {
    items: Vec<Item>,
    /// Where the next page starts; absent or empty on the last page.
    last_evaluated_key: Option<Item>,
}

/// Drain a paginated scan into plays.
///
/// `fetch_page` is called with the previous page's `LastEvaluatedKey` until
/// a page comes back without one. The first item that fails to decode, or
/// the first failed page, fails the whole call; later pages are not fetched.
async fn collect_scan_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<Play>>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<ScanPage>>,
{
    let mut plays = Vec::new();
    let mut start_key = None;

    loop {
        let page = fetch_page(start_key.take()).await?;

        for item in &page.items {
            plays.push(item_to_play(item)?);
        }

        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => break,
        }
    }

    Ok(plays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use squiggle_core::storage::RepositoryError;

    fn stored(id: &str) -> Item {
        play_to_item(&Play::new(format!("Play {id}"), Vec::new()).with_id(id))
    }

    fn resume_after(id: &str) -> Option<Item> {
        Some(HashMap::from([(ID_ATTRIBUTE.to_string(), play_key(id))]))
    }

    /// Serves canned pages in order and records the start key of each request.
    struct FakeScan {
        pages: Mutex<VecDeque<Result<ScanPage>>>,
        start_keys: Mutex<Vec<Option<Item>>>,
    }

    impl FakeScan {
        fn new(pages: Vec<Result<ScanPage>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                start_keys: Mutex::new(Vec::new()),
            }
        }

        async fn collect(&self) -> Result<Vec<Play>> {
            collect_scan_pages(|start_key| {
                self.start_keys.lock().unwrap().push(start_key);
                let page = self
                    .pages
                    .lock()
                    .unwrap()
                    .pop_front()
                    .expect("scan asked for more pages than exist");
                async move { page }
            })
            .await
        }

        fn requests(&self) -> usize {
            self.start_keys.lock().unwrap().len()
        }
    }

    fn ids(plays: &[Play]) -> Vec<&str> {
        plays.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_follows_last_evaluated_key_across_pages() {
        let scan = FakeScan::new(vec![
            Ok(ScanPage {
                items: vec![stored("a"), stored("b")],
                last_evaluated_key: resume_after("b"),
            }),
            Ok(ScanPage {
                items: Vec::new(),
                last_evaluated_key: resume_after("b2"),
            }),
            Ok(ScanPage {
                items: vec![stored("c")],
                last_evaluated_key: None,
            }),
        ]);

        let plays = scan.collect().await.unwrap();

        assert_eq!(ids(&plays), vec!["a", "b", "c"]);
        let start_keys = scan.start_keys.lock().unwrap();
        assert_eq!(
            *start_keys,
            vec![None, resume_after("b"), resume_after("b2")]
        );
    }

    #[tokio::test]
    async fn test_empty_last_evaluated_key_ends_scan() {
        let scan = FakeScan::new(vec![Ok(ScanPage {
            items: vec![stored("a")],
            last_evaluated_key: Some(HashMap::new()),
        })]);

        let plays = scan.collect().await.unwrap();

        assert_eq!(ids(&plays), vec!["a"]);
        assert_eq!(scan.requests(), 1);
    }

    #[tokio::test]
    async fn test_empty_table() {
        let scan = FakeScan::new(vec![Ok(ScanPage {
            items: Vec::new(),
            last_evaluated_key: None,
        })]);

        assert!(scan.collect().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_record_fails_whole_listing() {
        let mut broken = stored("b");
        broken.remove("createdAt");

        let scan = FakeScan::new(vec![
            Ok(ScanPage {
                items: vec![stored("a")],
                last_evaluated_key: resume_after("a"),
            }),
            Ok(ScanPage {
                items: vec![broken, stored("c")],
                last_evaluated_key: resume_after("c"),
            }),
            Ok(ScanPage {
                items: vec![stored("d")],
                last_evaluated_key: None,
            }),
        ]);

        let err = scan.collect().await.unwrap_err();

        assert!(matches!(err, RepositoryError::Serialization(_)));
        assert_eq!(scan.requests(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_fails_whole_listing() {
        let scan = FakeScan::new(vec![
            Ok(ScanPage {
                items: vec![stored("a")],
                last_evaluated_key: resume_after("a"),
            }),
            Err(RepositoryError::ConnectionFailed("reset".to_string())),
        ]);

        let err = scan.collect().await.unwrap_err();

        assert_eq!(err, RepositoryError::ConnectionFailed("reset".to_string()));
    }
}
