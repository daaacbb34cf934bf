use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use custody_coach::application::ports::{
    FileLoaderError, LlmClient, LlmClientError, OcrEngine, OcrError, OcrWorker, PageRasterizer,
};

/// Counts worker acquisitions and releases across every worker it hands out.
#[derive(Default)]
pub struct OcrCounters {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub recognized: AtomicUsize,
}

impl OcrCounters {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn recognized(&self) -> usize {
        self.recognized.load(Ordering::SeqCst)
    }
}

pub enum OcrBehavior {
    Text(String),
    /// Fails only the image at this zero-based position within a worker's lifetime.
    FailImageAt(usize, String),
    FailEveryImage,
    Unavailable,
}

pub struct MockOcrEngine {
    behavior: Arc<OcrBehavior>,
    pub counters: Arc<OcrCounters>,
}

impl MockOcrEngine {
    pub fn returning(text: &str) -> Self {
        Self::with_behavior(OcrBehavior::Text(text.to_string()))
    }

    pub fn with_behavior(behavior: OcrBehavior) -> Self {
        Self {
            behavior: Arc::new(behavior),
            counters: Arc::new(OcrCounters::default()),
        }
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn acquire(&self) -> Result<Box<dyn OcrWorker>, OcrError> {
        if let OcrBehavior::Unavailable = *self.behavior {
            return Err(OcrError::Unavailable("mock engine offline".to_string()));
        }
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockOcrWorker {
            behavior: Arc::clone(&self.behavior),
            counters: Arc::clone(&self.counters),
            seen: 0,
        }))
    }
}

struct MockOcrWorker {
    behavior: Arc<OcrBehavior>,
    counters: Arc<OcrCounters>,
    seen: usize,
}

#[async_trait]
impl OcrWorker for MockOcrWorker {
    async fn recognize(&mut self, _image: &[u8]) -> Result<String, OcrError> {
        self.counters.recognized.fetch_add(1, Ordering::SeqCst);
        let position = self.seen;
        self.seen += 1;
        match &*self.behavior {
            OcrBehavior::Text(text) => Ok(text.clone()),
            OcrBehavior::FailImageAt(failing, _) if *failing == position => {
                Err(OcrError::RecognitionFailed("mock page failure".to_string()))
            }
            OcrBehavior::FailImageAt(_, text) => Ok(format!("{text} {}", position + 1)),
            OcrBehavior::FailEveryImage => {
                Err(OcrError::RecognitionFailed("mock failure".to_string()))
            }
            OcrBehavior::Unavailable => Err(OcrError::Unavailable("unreachable".to_string())),
        }
    }

    fn release(self: Box<Self>) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Returns one placeholder image per page up to `max_pages`.
pub struct MockRasterizer {
    pub page_count: usize,
    pub calls: AtomicUsize,
}

impl MockRasterizer {
    pub fn with_pages(page_count: usize) -> Self {
        Self {
            page_count,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PageRasterizer for MockRasterizer {
    fn rasterize(&self, _data: &[u8], max_pages: usize) -> Result<Vec<Vec<u8>>, FileLoaderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..self.page_count.min(max_pages))
            .map(|_| super::fixtures::fake_png())
            .collect())
    }
}

pub struct FailingRasterizer;

impl PageRasterizer for FailingRasterizer {
    fn rasterize(&self, _data: &[u8], _max_pages: usize) -> Result<Vec<Vec<u8>>, FileLoaderError> {
        Err(FileLoaderError::ExtractionFailed(
            "pdfium not available".to_string(),
        ))
    }
}

/// Records what the coaching service sent and replies with a fixed completion.
pub struct MockLlmClient {
    reply: Result<String, ()>,
    pub last_prompt: Mutex<Option<String>>,
    pub last_context: Mutex<Option<String>>,
}

impl MockLlmClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            last_prompt: Mutex::new(None),
            last_context: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(()),
            last_prompt: Mutex::new(None),
            last_context: Mutex::new(None),
        }
    }

    pub fn context(&self) -> Option<String> {
        self.last_context.lock().unwrap().clone()
    }

    pub fn prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str, context: &str) -> Result<String, LlmClientError> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_context.lock().unwrap() = Some(context.to_string());
        self.reply
            .clone()
            .map_err(|_| LlmClientError::ApiRequestFailed("mock upstream down".to_string()))
    }
}
