//! Search dispatch: runs the pipeline on the async runtime and reports back over a channel,
//! so the thread that owns the interface never blocks on the network.

use std::sync::{Arc, mpsc};

use tokio::runtime::Handle;

use crate::{error::LookupError, model::SearchResult, pipeline::WeatherPipeline};

/// Messages sent from a finished search back to the interface thread.
#[derive(Debug)]
pub enum SearchMessage {
    /// Exactly one per requested search.
    Done {
        query: String,
        result: Result<SearchResult, LookupError>,
    },
}

#[derive(Debug, Clone)]
pub struct SearchService {
    pipeline: Arc<WeatherPipeline>,
    runtime: Handle,
    tx: mpsc::Sender<SearchMessage>,
}

impl SearchService {
    /// Returns the service and the receiving end the interface should poll.
    pub fn new(
        pipeline: Arc<WeatherPipeline>,
        runtime: Handle,
    ) -> (Self, mpsc::Receiver<SearchMessage>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                pipeline,
                runtime,
                tx,
            },
            rx,
        )
    }

    /// Start a search in the background. There is no cancellation: it runs to a result
    /// or to the network timeout.
    pub fn request_search(&self, query: impl Into<String>) {
        let query = query.into();
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = pipeline.search(&query).await;
            if let Err(err) = &result {
                tracing::debug!("Search for '{}' failed: {}", query, err);
            }
            // Receiver gone means the interface shut down; nothing left to update.
            let _ = tx.send(SearchMessage::Done { query, result });
        });
    }
}
